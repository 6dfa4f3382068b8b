// Live container network state and lifecycle actions via bollard

mod logs;

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{
    ListContainersOptions, RestartContainerOptionsBuilder, StartContainerOptions,
    StopContainerOptionsBuilder,
};
use bollard::models::ContainerSummary;

use crate::models::RuntimeRecord;
use crate::sources::{RuntimeSource, UpstreamError};

/// Grace period the engine gives a container before killing it on stop/restart.
const STOP_GRACE_SECS: i32 = 30;

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        Ok(Self { docker })
    }

    pub async fn start_container(&self, id: &str) -> anyhow::Result<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions>)
            .await?;
        Ok(())
    }

    pub async fn stop_container(&self, id: &str) -> anyhow::Result<()> {
        let options = StopContainerOptionsBuilder::new().t(STOP_GRACE_SECS).build();
        self.docker.stop_container(id, Some(options)).await?;
        Ok(())
    }

    pub async fn restart_container(&self, id: &str) -> anyhow::Result<()> {
        let options = RestartContainerOptionsBuilder::new()
            .t(STOP_GRACE_SECS)
            .build();
        self.docker.restart_container(id, Some(options)).await?;
        Ok(())
    }
}

#[async_trait]
impl RuntimeSource for DockerRepo {
    /// One `list_containers` call covers every running container; stopped
    /// containers have no live network state worth reporting.
    async fn fetch_network(&self) -> Result<Vec<RuntimeRecord>, UpstreamError> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let options = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(map_docker_error)?;
        Ok(containers.iter().map(runtime_record).collect())
    }
}

fn map_docker_error(e: bollard::errors::Error) -> UpstreamError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 401 | 403,
            message,
        } => UpstreamError::Unauthorized(message),
        other => UpstreamError::Unavailable(other.to_string()),
    }
}

/// Mine one engine summary for the fields the normalizer joins on.
/// Addresses sort by network name so record contents are stable across polls.
pub(crate) fn runtime_record(summary: &ContainerSummary) -> RuntimeRecord {
    let id = summary.id.clone().unwrap_or_default();
    let name = summary
        .names
        .as_ref()
        .and_then(|n| n.first())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| id.clone());
    let network_mode = summary
        .host_config
        .as_ref()
        .and_then(|h| h.network_mode.clone())
        .unwrap_or_default();

    let mut named_addresses: Vec<(String, String)> = Vec::new();
    if let Some(networks) = summary
        .network_settings
        .as_ref()
        .and_then(|s| s.networks.as_ref())
    {
        for (network_name, endpoint) in networks {
            if let Some(ip) = endpoint.ip_address.as_ref().filter(|ip| !ip.is_empty()) {
                named_addresses.push((network_name.clone(), ip.clone()));
            }
        }
    }
    named_addresses.sort();
    let addresses = named_addresses.into_iter().map(|(_, ip)| ip).collect();

    let mut ports = BTreeMap::new();
    if let Some(summary_ports) = summary.ports.as_ref() {
        for port in summary_ports {
            let Some(public) = port.public_port else {
                continue;
            };
            // First mapping wins when tcp and udp publish the same port.
            ports.entry(port.private_port as u16).or_insert(public as u16);
        }
    }

    RuntimeRecord {
        id,
        name,
        network_mode,
        addresses,
        ports,
    }
}
