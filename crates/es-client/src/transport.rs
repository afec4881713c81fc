//! HTTP transport
//!
//! The retrieval engine only talks to the cluster through [`Transport`], so
//! tests can substitute a scripted implementation for [`HttpClient`].

use crate::config::ClientConfig;
use crate::error::{EsError, Result};
use reqwest::blocking::Client;
use reqwest::header;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{trace, warn};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Statuses that are worth retrying: the cluster may recover on its own
pub const RETRY_STATUSES: &[u16] = &[500, 502, 503, 504];

const BACKOFF_MAX: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    pub content_type: Option<&'static str>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
            content_type: None,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body.into()),
            content_type: None,
        }
    }

    pub fn delete(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            body: Some(body.into()),
            content_type: None,
        }
    }

    /// Mark the body as JSON
    pub fn json(mut self) -> Self {
        self.content_type = Some(CONTENT_TYPE_JSON);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`EsError::Status`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(EsError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Something that can execute HTTP requests against a cluster
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// When and how long to wait before re-sending a request
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub total: u32,
    /// Base of the exponential backoff, in seconds
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            total: 5,
            backoff_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    pub fn should_retry(&self, status: u16, retries_so_far: u32) -> bool {
        retries_so_far < self.total && RETRY_STATUSES.contains(&status)
    }

    /// Delay before the `retry`-th retry (1-based).
    ///
    /// The first retry is immediate; after that the delay doubles each time,
    /// starting from `2 * backoff_factor`.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let secs = self.backoff_factor * 2f64.powi(retry as i32 - 1);
        Duration::try_from_secs_f64(secs)
            .map(|d| d.min(BACKOFF_MAX))
            .unwrap_or(BACKOFF_MAX)
    }

    /// Send `request` through `send`, re-sending while the response status
    /// is retryable and retries remain. Errors from `send` end the loop.
    pub fn run<F>(&self, request: &HttpRequest, mut send: F) -> Result<HttpResponse>
    where
        F: FnMut(&HttpRequest) -> Result<HttpResponse>,
    {
        let mut retries = 0;
        loop {
            trace!("{} {}", request.method, request.url);
            let response = send(request)?;
            if !self.should_retry(response.status, retries) {
                return Ok(response);
            }

            retries += 1;
            let delay = self.backoff(retries);
            warn!(
                status = response.status,
                retry = retries,
                of = self.total,
                delay_ms = delay.as_millis() as u64,
                "{} {} failed, retrying",
                request.method,
                request.url
            );
            std::thread::sleep(delay);
        }
    }
}

/// Blocking HTTP client with retry on 5xx responses.
///
/// Network level failures and 4xx responses are never retried.
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            retry: RetryPolicy {
                total: config.retries,
                backoff_factor: config.backoff_factor,
            },
        })
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        if let Some(content_type) = request.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

impl Transport for HttpClient {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.retry.run(request, |request| self.send_once(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(500, true)]
    #[case(502, true)]
    #[case(503, true)]
    #[case(504, true)]
    #[case(400, false)]
    #[case(404, false)]
    #[case(429, false)]
    #[case(200, false)]
    fn test_retry_statuses(#[case] status: u16, #[case] retry: bool) {
        assert_eq!(RetryPolicy::default().should_retry(status, 0), retry);
    }

    #[test]
    fn test_retries_are_bounded() {
        let policy = RetryPolicy {
            total: 2,
            backoff_factor: 0.1,
        };
        assert!(policy.should_retry(503, 1));
        assert!(!policy.should_retry(503, 2));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            total: 5,
            backoff_factor: 0.5,
        };
        assert_eq!(policy.backoff(1), Duration::ZERO);
        assert_eq!(policy.backoff(2), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            total: 100,
            backoff_factor: 10.0,
        };
        assert_eq!(policy.backoff(50), BACKOFF_MAX);
    }

    #[test]
    fn test_zero_factor_never_sleeps() {
        let policy = RetryPolicy {
            total: 5,
            backoff_factor: 0.0,
        };
        assert_eq!(policy.backoff(4), Duration::ZERO);
    }

    #[test]
    fn test_error_for_status() {
        assert!(HttpResponse::new(200, "{}").error_for_status().is_ok());
        let err = HttpResponse::new(404, "no such index")
            .error_for_status()
            .unwrap_err();
        assert!(matches!(err, EsError::Status { status: 404, ref body } if body == "no such index"));
    }

    fn no_sleep(total: u32) -> RetryPolicy {
        RetryPolicy {
            total,
            backoff_factor: 0.0,
        }
    }

    fn scripted(statuses: &[u16]) -> impl FnMut(&HttpRequest) -> Result<HttpResponse> + '_ {
        let mut next = statuses.iter();
        move |_: &HttpRequest| match next.next() {
            Some(&status) => Ok(HttpResponse::new(status, status.to_string())),
            None => Err(EsError::InvalidResponse("no more responses".to_string())),
        }
    }

    #[test]
    fn test_run_retries_until_success() {
        let request = HttpRequest::get("http://es:9200/");
        let mut sent = 0;
        let mut send = scripted(&[503, 503, 200]);
        let response = no_sleep(5)
            .run(&request, |r| {
                sent += 1;
                send(r)
            })
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(sent, 3);
    }

    #[test]
    fn test_run_gives_up_after_total_retries() {
        let request = HttpRequest::get("http://es:9200/");
        let mut sent = 0;
        let mut send = scripted(&[502, 502, 502, 200]);
        let response = no_sleep(2)
            .run(&request, |r| {
                sent += 1;
                send(r)
            })
            .unwrap();
        assert_eq!(response.status, 502);
        assert_eq!(sent, 3);
    }

    #[test]
    fn test_run_does_not_retry_client_errors() {
        let request = HttpRequest::get("http://es:9200/");
        let mut sent = 0;
        let mut send = scripted(&[404, 200]);
        let response = no_sleep(5)
            .run(&request, |r| {
                sent += 1;
                send(r)
            })
            .unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(sent, 1);
    }

    #[test]
    fn test_run_propagates_send_errors() {
        let request = HttpRequest::get("http://es:9200/");
        let result = no_sleep(5).run(&request, scripted(&[503]));
        assert!(matches!(result, Err(EsError::InvalidResponse(_))));
    }

    #[test]
    fn test_json_request() {
        let request = HttpRequest::post("http://es:9200/_search", "{}").json();
        assert_eq!(request.content_type, Some(CONTENT_TYPE_JSON));
        assert_eq!(request.method, Method::Post);
    }
}
