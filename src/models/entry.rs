// Canonical service entity and its enums

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What kind of service an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceKind {
    Container,
    VirtualMachine,
}

/// Run state folded from heterogeneous upstream strings; serializes to
/// lowercase JSON (e.g. "running"). Unknown raw values land in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Stopped,
    Paused,
    Other(String),
}

impl RunState {
    /// Fold a raw upstream state string ("running", "exited", "shutoff", ...).
    /// Never fails; anything unrecognized is carried through as `Other`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "running" => RunState::Running,
            "exited" | "stopped" | "shutoff" => RunState::Stopped,
            "paused" => RunState::Paused,
            _ => RunState::Other(raw.to_string()),
        }
    }
}

/// Container network attachment, folded from the engine's raw mode string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NetworkMode {
    Bridge,
    Macvlan,
    /// Shares another container's network namespace; carries the raw
    /// `container:<id-or-name>` target reference.
    ContainerShared(String),
    Host,
    Unknown,
}

impl NetworkMode {
    /// Fold a raw engine mode string. Custom bridges named "br0", "br0.100"
    /// and the like are macvlan-style networks with their own LAN addresses.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return NetworkMode::Unknown;
        }
        if let Some(target) = trimmed.strip_prefix("container:") {
            return NetworkMode::ContainerShared(target.to_string());
        }
        match trimmed.to_lowercase().as_str() {
            "bridge" | "default" => NetworkMode::Bridge,
            "host" => NetworkMode::Host,
            mode if mode.starts_with("br") => NetworkMode::Macvlan,
            _ => NetworkMode::Unknown,
        }
    }
}

/// Live network state attached to an entry by a refresh: interface addresses
/// and exposed-port to host-port mappings. Empty until the runtime source
/// reports the entry, or when inheritance fails closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFacts {
    pub addresses: Vec<String>,
    pub ports: BTreeMap<u16, u16>,
}

impl NetworkFacts {
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.ports.is_empty()
    }
}

/// One discovered service. Value object: each refresh builds a fresh set,
/// nothing is mutated across cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    /// Stable identifier from the metadata source.
    pub id: String,
    pub kind: ServiceKind,
    pub name: String,
    pub run_state: RunState,
    pub image: Option<String>,
    pub icon_ref: Option<String>,
    /// Containers only; VMs carry `None`.
    pub network_mode: Option<NetworkMode>,
    /// Raw web UI label, placeholders unsubstituted (e.g. "http://[IP]:[PORT:8080]/").
    pub web_ui_template: Option<String>,
    pub network_facts: NetworkFacts,
    /// Derived by the resolver every refresh; absent when resolution fails closed.
    pub resolved_url: Option<String>,
}
