//! In-memory transport for tests

use crate::error::{EsError, Result};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Replays canned responses in order and records every request
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request.clone());
        self.responses.borrow_mut().pop_front().ok_or_else(|| {
            EsError::InvalidResponse(format!("unexpected request {}", request.url))
        })
    }
}

/// A search page holding `count` documents numbered from `first`
pub fn page(total: Value, first: usize, count: usize, scroll_id: &str) -> HttpResponse {
    let hits: Vec<Value> = (first..first + count)
        .map(|i| json!({"_id": i.to_string(), "_source": {"id": i}}))
        .collect();
    let body = json!({
        "_scroll_id": scroll_id,
        "hits": {"total": total, "hits": hits},
    });
    HttpResponse::new(200, body.to_string())
}
