// Shared test fixtures: upstream record builders

use std::collections::{BTreeMap, HashMap};

use svclens::models::{ContainerRecord, MetadataInventory, RuntimeRecord, VmRecord};

pub fn container_record(
    id: &str,
    name: &str,
    state: &str,
    labels: &[(&str, &str)],
) -> ContainerRecord {
    ContainerRecord {
        id: id.to_string(),
        names: vec![format!("/{name}")],
        image: Some(format!("{name}:latest")),
        state: state.to_string(),
        labels: labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    }
}

pub fn vm_record(id: &str, name: &str, state: &str) -> VmRecord {
    VmRecord {
        id: id.to_string(),
        name: name.to_string(),
        state: state.to_string(),
    }
}

pub fn runtime_record(
    id: &str,
    name: &str,
    mode: &str,
    addresses: &[&str],
    ports: &[(u16, u16)],
) -> RuntimeRecord {
    RuntimeRecord {
        id: id.to_string(),
        name: name.to_string(),
        network_mode: mode.to_string(),
        addresses: addresses.iter().map(|a| a.to_string()).collect(),
        ports: ports.iter().copied().collect::<BTreeMap<_, _>>(),
    }
}

pub fn inventory(containers: Vec<ContainerRecord>, vms: Vec<VmRecord>) -> MetadataInventory {
    MetadataInventory {
        containers,
        vms,
        metrics: None,
    }
}
