// Upstream source records, pre-normalization

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One inventory pull from the metadata source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataInventory {
    pub containers: Vec<ContainerRecord>,
    pub vms: Vec<VmRecord>,
    pub metrics: Option<super::HostMetrics>,
}

/// Container as the metadata source reports it. Fields default individually
/// so one sparse record decodes instead of discarding the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerRecord {
    pub id: String,
    /// Engine-style names, usually with a leading slash ("/plex").
    pub names: Vec<String>,
    pub image: Option<String>,
    pub state: String,
    pub labels: HashMap<String, String>,
}

/// Virtual machine as the metadata source reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VmRecord {
    pub id: String,
    pub name: String,
    pub state: String,
}

/// Live network state for one running container, from the runtime source.
/// `network_mode` stays raw here; the normalizer owns the folding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeRecord {
    pub id: String,
    pub name: String,
    pub network_mode: String,
    pub addresses: Vec<String>,
    /// exposed (container) port -> published host port
    pub ports: BTreeMap<u16, u16>,
}

/// One parsed container log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    /// "YYYY-MM-DD HH:MM:SS", or empty when the raw line carried no stamp.
    pub timestamp: String,
    pub message: String,
}
