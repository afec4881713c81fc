// es-client/src/config.rs
//! 客户端配置

use std::time::Duration;

/// Client settings, fixed for the lifetime of a client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Retries on 500/502/503/504 responses
    pub retries: u32,
    /// Exponential backoff base between retries, in seconds
    pub backoff_factor: f64,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Release the scroll context on the server once a search finishes
    pub clear_scroll: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retries: 5,
            backoff_factor: 0.1,
            timeout: None,
            clear_scroll: false,
        }
    }
}
