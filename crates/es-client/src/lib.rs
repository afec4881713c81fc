// es-client/src/lib.rs
//! Elasticsearch 检索客户端
//!
//! Retrieves every document matching a query by scrolling through the
//! results page by page:
//! - probes the cluster once to pick the scroll protocol for its version
//! - accumulates `_source` bodies until the reported total (or a cap) is met
//! - fails rather than return fewer documents than the cluster promised

pub mod client;
pub mod config;
pub mod error;
pub mod fetch_all;
pub mod models;
pub mod strategy;
pub mod transport;
pub mod version;

#[cfg(test)]
mod testing;

// 重导出核心类型
pub use client::Uptasticsearch;
pub use config::ClientConfig;
pub use error::{EsError, Result};
pub use fetch_all::{es_search, search_to_table};
pub use models::{ensure_not_aggregation, Page, SearchSpec};
pub use strategy::{Relation, ScrollStrategy, TotalHits};
pub use transport::{HttpClient, HttpRequest, HttpResponse, Method, RetryPolicy, Transport};
pub use version::{probe, resolve, ClusterVersion};
