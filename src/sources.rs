// Upstream source traits the refresher polls through.
// Trait objects so tests can script upstreams without a socket.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{MetadataInventory, RuntimeRecord};

/// Why an upstream call produced nothing this cycle. Either way the failed
/// source degrades alone; the other source still publishes.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Unreachable, timed out, errored, or returned an undecodable body.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    /// The source rejected our credentials (e.g. HTTP 401/403).
    #[error("upstream rejected credentials: {0}")]
    Unauthorized(String),
}

/// Authoritative inventory: which containers/VMs exist, their states, labels,
/// and host metrics.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_inventory(&self) -> Result<MetadataInventory, UpstreamError>;
}

/// Live network truth for running containers: modes, addresses, port bindings.
#[async_trait]
pub trait RuntimeSource: Send + Sync {
    async fn fetch_network(&self) -> Result<Vec<RuntimeRecord>, UpstreamError>;
}
