// es-client/src/client.rs
//! Scrolling search client

use crate::config::ClientConfig;
use crate::error::{EsError, Result};
use crate::models::{ensure_not_aggregation, Page, SearchSpec};
use crate::strategy::{ScrollStrategy, TotalHits};
use crate::transport::{HttpClient, HttpRequest, Transport};
use crate::version::{self, ClusterVersion};
use serde_json::Value;
use tracing::{debug, info, warn};
use validate::{convert_to_sec, format_es_url};

/// A client bound to one cluster.
///
/// The endpoint is validated and the scroll strategy chosen once, at
/// construction; every search made through the client reuses both.
pub struct Uptasticsearch<T: Transport = HttpClient> {
    endpoint: String,
    transport: T,
    strategy: ScrollStrategy,
    version: Option<ClusterVersion>,
    clear_scroll: bool,
}

impl Uptasticsearch<HttpClient> {
    /// Validate `url`, probe the cluster's version and build a matching client
    pub fn connect(url: &str, config: &ClientConfig) -> Result<Self> {
        let transport = HttpClient::new(config)?;
        Self::resolve(url, transport, config)
    }
}

impl<T: Transport> Uptasticsearch<T> {
    /// Probe the cluster through `transport` and pick the strategy it needs
    pub fn resolve(url: &str, transport: T, config: &ClientConfig) -> Result<Self> {
        let endpoint = format_es_url(url)?;
        let (version, strategy) = version::resolve(&transport, &endpoint)?;
        Ok(Self {
            endpoint,
            transport,
            strategy,
            version: Some(version),
            clear_scroll: config.clear_scroll,
        })
    }

    /// Build a client for a known strategy, without probing the cluster
    pub fn with_strategy(url: &str, transport: T, strategy: ScrollStrategy) -> Result<Self> {
        Ok(Self {
            endpoint: format_es_url(url)?,
            transport,
            strategy,
            version: None,
            clear_scroll: false,
        })
    }

    pub fn clear_scroll(mut self, enabled: bool) -> Self {
        self.clear_scroll = enabled;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn strategy(&self) -> ScrollStrategy {
        self.strategy
    }

    /// The version reported by the cluster, if it was probed
    pub fn version(&self) -> Option<&ClusterVersion> {
        self.version.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run a search and return the `_source` of every hit.
    ///
    /// Pages through a scroll context until the cluster's reported total (or
    /// `max_hits`, whichever is smaller) has been collected, or until the
    /// cluster returns an empty page. Ending up with fewer documents than
    /// promised is an error; no partial result is returned.
    pub fn search(&self, spec: &SearchSpec) -> Result<Vec<Value>> {
        ensure_not_aggregation(&spec.query)?;
        convert_to_sec(spec.scroll.as_str())?;

        let mut scroll_id = None;
        let collected = self.collect(spec, &mut scroll_id);
        if self.clear_scroll {
            if let Some(token) = scroll_id.as_deref() {
                self.release(token);
            }
        }

        let results = collected?;
        info!(documents = results.len(), index = %spec.index, "search complete");
        Ok(results)
    }

    /// Page through the scroll context. `scroll_id` always holds the latest
    /// token seen, even when an error cuts the scroll short.
    fn collect(&self, spec: &SearchSpec, scroll_id: &mut Option<String>) -> Result<Vec<Value>> {
        let url = spec.search_url(&self.endpoint);
        let request = HttpRequest::post(url, spec.query.as_str()).json();
        let first = self.send(&request)?;
        if let Some(token) = first.get("_scroll_id").and_then(Value::as_str) {
            *scroll_id = Some(token.to_string());
        }

        let total = self.strategy.extract_total(&first)?;
        let target = Target::new(total, spec.max_hits);
        if !total.is_exact() {
            warn!(
                lower_bound = total.value,
                "cluster reported a lower bound for total hits, scrolling until exhausted"
            );
        }

        let page: Page = serde_json::from_value(first)?;
        let mut results = page.into_sources()?;
        let mut last_page_size = results.len();
        let mut pages = 1;
        debug!(page = pages, hits = last_page_size, total = total.value, "fetched first page");

        while last_page_size > 0 && target.wants_more(results.len()) {
            let Some(token) = scroll_id.as_deref() else {
                return Err(EsError::InvalidResponse(
                    "response is missing _scroll_id".to_string(),
                ));
            };
            let request = self.strategy.encode_continuation(&self.endpoint, &spec.scroll, token);
            let mut page: Page = serde_json::from_value(self.send(&request)?)?;
            if let Some(latest) = page.scroll_id.take() {
                *scroll_id = Some(latest);
            }

            let docs = page.into_sources()?;
            last_page_size = docs.len();
            results.extend(docs);
            pages += 1;
            debug!(page = pages, hits = last_page_size, collected = results.len(), "fetched page");
        }

        if results.len() < target.required {
            return Err(EsError::Incomplete {
                expected: target.required,
                got: results.len(),
            });
        }

        if let Some(limit) = target.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    /// Release a scroll context. Failures are logged, not returned: the
    /// context expires on its own once its lifetime runs out.
    fn release(&self, scroll_id: &str) {
        let request = self.strategy.encode_clear(&self.endpoint, scroll_id);
        match self
            .transport
            .execute(&request)
            .and_then(|response| response.error_for_status())
        {
            Ok(_) => debug!("cleared scroll context"),
            Err(e) => warn!("failed to clear scroll context: {}", e),
        }
    }

    fn send(&self, request: &HttpRequest) -> Result<Value> {
        self.transport.execute(request)?.error_for_status()?.json()
    }
}

/// How many documents a search must collect, and where it may stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Target {
    /// Stop scrolling once this many documents are collected; `None` means
    /// scroll until the cluster returns an empty page
    limit: Option<usize>,
    /// Fewer than this many documents is a failed search
    required: usize,
}

impl Target {
    fn new(total: TotalHits, max_hits: Option<usize>) -> Self {
        let reported = usize::try_from(total.value).unwrap_or(usize::MAX);
        let required = max_hits.map_or(reported, |cap| cap.min(reported));
        let limit = if total.is_exact() { Some(required) } else { max_hits };
        Self { limit, required }
    }

    fn wants_more(&self, collected: usize) -> bool {
        self.limit.map_or(true, |limit| collected < limit)
    }
}
