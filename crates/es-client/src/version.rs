// es-client/src/version.rs
//! Cluster version probe

use crate::error::{EsError, Result};
use crate::strategy::ScrollStrategy;
use crate::transport::{HttpRequest, Transport};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct RootResponse {
    version: VersionInfo,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    number: String,
}

/// Version string reported by `GET /`, e.g. `"6.8.23"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterVersion {
    pub number: String,
}

impl ClusterVersion {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }

    /// Everything before the first `.`
    pub fn major(&self) -> &str {
        self.number.split('.').next().unwrap_or_default()
    }

    /// Pick the scroll strategy for this version. Unknown majors are an
    /// error, never a fallback to the newest protocol.
    pub fn strategy(&self) -> Result<ScrollStrategy> {
        ScrollStrategy::from_major(self.major()).ok_or_else(|| EsError::UnsupportedVersion {
            version: self.number.clone(),
            major: self.major().to_string(),
        })
    }
}

/// Ask the cluster at `endpoint` for its version
pub fn probe<T: Transport + ?Sized>(transport: &T, endpoint: &str) -> Result<ClusterVersion> {
    let response = transport
        .execute(&HttpRequest::get(format!("{}/", endpoint)))?
        .error_for_status()?;
    let root: RootResponse = serde_json::from_str(&response.body)?;
    Ok(ClusterVersion::new(root.version.number))
}

/// Probe the cluster once and select the matching scroll strategy
pub fn resolve<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
) -> Result<(ClusterVersion, ScrollStrategy)> {
    let version = probe(transport, endpoint)?;
    let strategy = version.strategy()?;
    info!(version = %version.number, %strategy, "resolved cluster version for {}", endpoint);
    Ok((version, strategy))
}
