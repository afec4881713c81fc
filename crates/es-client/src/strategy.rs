// es-client/src/strategy.rs
//! Per-version scroll protocol.
//!
//! Elasticsearch changed two things about scrolling over its lifetime:
//! - 1.x takes the scroll id as a raw request body with the lifetime in the
//!   URL; 2.x onwards takes a JSON body holding both
//! - 7.x reports `hits.total` as `{"value": n, "relation": "eq"|"gte"}`
//!   instead of a bare integer

use crate::error::{EsError, Result};
use crate::transport::HttpRequest;
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollStrategy {
    V1,
    V2,
    V5,
    V6,
    V7,
}

/// Whether a reported hit count is exact or a lower bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Gte,
}

impl Relation {
    fn parse(relation: &str) -> Result<Self> {
        match relation {
            "eq" => Ok(Relation::Eq),
            "gte" => Ok(Relation::Gte),
            other => Err(EsError::InvalidResponse(format!(
                "unknown hits.total.relation '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalHits {
    pub value: u64,
    pub relation: Relation,
}

impl TotalHits {
    pub fn exact(value: u64) -> Self {
        Self {
            value,
            relation: Relation::Eq,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.relation == Relation::Eq
    }
}

impl ScrollStrategy {
    pub const ALL: [ScrollStrategy; 5] = [
        ScrollStrategy::V1,
        ScrollStrategy::V2,
        ScrollStrategy::V5,
        ScrollStrategy::V6,
        ScrollStrategy::V7,
    ];

    /// Look up the strategy for a major version, e.g. `"6"`
    pub fn from_major(major: &str) -> Option<Self> {
        match major {
            "1" => Some(ScrollStrategy::V1),
            "2" => Some(ScrollStrategy::V2),
            "5" => Some(ScrollStrategy::V5),
            "6" => Some(ScrollStrategy::V6),
            "7" => Some(ScrollStrategy::V7),
            _ => None,
        }
    }

    pub fn major(&self) -> u32 {
        match self {
            ScrollStrategy::V1 => 1,
            ScrollStrategy::V2 => 2,
            ScrollStrategy::V5 => 5,
            ScrollStrategy::V6 => 6,
            ScrollStrategy::V7 => 7,
        }
    }

    /// `hits.total` is an object rather than an integer
    pub fn has_nested_total(&self) -> bool {
        matches!(self, ScrollStrategy::V7)
    }

    /// Scroll ids travel as a raw body, lifetime as a query parameter
    pub fn has_raw_scroll_body(&self) -> bool {
        matches!(self, ScrollStrategy::V1)
    }

    /// Build the request for the next page of a scroll
    pub fn encode_continuation(&self, endpoint: &str, scroll: &str, scroll_id: &str) -> HttpRequest {
        if self.has_raw_scroll_body() {
            HttpRequest::post(
                format!("{}/_search/scroll?scroll={}", endpoint, scroll),
                scroll_id,
            )
        } else {
            let body = json!({ "scroll": scroll, "scroll_id": scroll_id });
            HttpRequest::post(format!("{}/_search/scroll", endpoint), body.to_string()).json()
        }
    }

    /// Build the request that releases a scroll context on the server
    pub fn encode_clear(&self, endpoint: &str, scroll_id: &str) -> HttpRequest {
        let url = format!("{}/_search/scroll", endpoint);
        if self.has_raw_scroll_body() {
            HttpRequest::delete(url, scroll_id)
        } else {
            let body = json!({ "scroll_id": [scroll_id] });
            HttpRequest::delete(url, body.to_string()).json()
        }
    }

    /// Read the number of documents matching the query from the first page
    pub fn extract_total(&self, page: &Value) -> Result<TotalHits> {
        if !self.has_nested_total() {
            return page
                .pointer("/hits/total")
                .and_then(Value::as_u64)
                .map(TotalHits::exact)
                .ok_or_else(|| {
                    EsError::InvalidResponse("expected an integer at hits.total".to_string())
                });
        }

        let value = page
            .pointer("/hits/total/value")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                EsError::InvalidResponse("expected an integer at hits.total.value".to_string())
            })?;
        let relation = match page.pointer("/hits/total/relation").and_then(Value::as_str) {
            Some(relation) => Relation::parse(relation)?,
            None => Relation::Eq,
        };
        Ok(TotalHits { value, relation })
    }
}

impl fmt::Display for ScrollStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Elasticsearch {}.x", self.major())
    }
}
