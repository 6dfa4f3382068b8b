// Published snapshot and its health/metrics payloads

use serde::{Deserialize, Serialize};

use super::ServiceEntry;

/// Which upstream calls succeeded in the cycle that produced a snapshot.
/// A false flag means that source's last known-good payload is being reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceHealth {
    pub metadata_ok: bool,
    pub runtime_ok: bool,
}

/// Host-level metrics reported by the metadata source alongside the inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostMetrics {
    pub cpu_percent: f64,
    pub mem_bytes_used: u64,
    pub mem_bytes_total: u64,
    pub temp_celsius: Option<f64>,
    pub uptime_seconds: u64,
}

/// Unit of publication. Immutable once published; readers share it by `Arc`
/// and the cache replaces the whole value atomically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub entities: Vec<ServiceEntry>,
    /// Epoch millis of the cycle that produced this snapshot; 0 before the
    /// first successful refresh.
    pub generated_at: u64,
    pub source_health: SourceHealth,
    pub metrics: Option<HostMetrics>,
}
