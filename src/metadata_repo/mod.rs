// Inventory client for the host management API

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{ContainerRecord, HostMetrics, MetadataInventory, VmRecord};
use crate::sources::{MetadataSource, UpstreamError};

pub struct MetadataRepo {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Wire shape of GET /api/v1/inventory. Records stay raw JSON here and decode
/// one at a time, so a single malformed record never discards the batch.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct InventoryWire {
    containers: Vec<serde_json::Value>,
    vms: Vec<serde_json::Value>,
    metrics: Option<serde_json::Value>,
}

impl MetadataRepo {
    pub fn new(
        base_url: &str,
        api_key: &str,
        verify_tls: bool,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs));
        if !verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl MetadataSource for MetadataRepo {
    async fn fetch_inventory(&self) -> Result<MetadataInventory, UpstreamError> {
        let url = format!("{}/api/v1/inventory", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(UpstreamError::Unauthorized(format!(
                "inventory request rejected with {status}"
            )));
        }
        if !status.is_success() {
            return Err(UpstreamError::Unavailable(format!(
                "inventory request failed with {status}"
            )));
        }

        let wire: InventoryWire = response
            .json()
            .await
            .map_err(|e| UpstreamError::Unavailable(format!("inventory body undecodable: {e}")))?;
        Ok(decode_inventory(wire))
    }
}

fn decode_inventory(wire: InventoryWire) -> MetadataInventory {
    let containers = wire
        .containers
        .into_iter()
        .filter_map(|value| decode_record::<ContainerRecord>(value, "container"))
        .collect();
    let vms = wire
        .vms
        .into_iter()
        .filter_map(|value| decode_record::<VmRecord>(value, "vm"))
        .collect();
    let metrics = wire.metrics.and_then(|value| {
        match serde_json::from_value::<HostMetrics>(value) {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                tracing::warn!(error = %e, operation = "decode_metrics", "ignoring malformed metrics");
                None
            }
        }
    });
    MetadataInventory {
        containers,
        vms,
        metrics,
    }
}

fn decode_record<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    record_kind: &str,
) -> Option<T> {
    match serde_json::from_value::<T>(value) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "decode_record",
                record_kind,
                "skipping malformed record"
            );
            None
        }
    }
}
