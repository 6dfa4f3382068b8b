// Entity normalizer: joins metadata records with runtime network state.
// Pure; all I/O stays in the adapters.

use std::collections::HashMap;

use crate::models::{
    ContainerRecord, MetadataInventory, NetworkFacts, NetworkMode, RunState, RuntimeRecord,
    ServiceEntry, ServiceKind, VmRecord,
};

/// Dashboard label carrying the templated web UI address.
pub const WEBUI_LABEL: &str = "net.unraid.docker.webui";
/// Dashboard label carrying the icon image reference.
pub const ICON_LABEL: &str = "net.unraid.docker.icon";

/// Build the entity list for one refresh cycle. Output order follows the
/// metadata source (containers first, then VMs); a container with no runtime
/// record is still listed, with `Unknown` mode and empty facts.
pub fn normalize(inventory: &MetadataInventory, runtime: &[RuntimeRecord]) -> Vec<ServiceEntry> {
    let by_id: HashMap<&str, &RuntimeRecord> =
        runtime.iter().map(|r| (r.id.as_str(), r)).collect();

    let mut entries = Vec::with_capacity(inventory.containers.len() + inventory.vms.len());
    for record in &inventory.containers {
        if record.id.is_empty() {
            tracing::warn!(
                operation = "normalize",
                name = ?record.names.first(),
                "skipping container record with empty id"
            );
            continue;
        }
        entries.push(container_entry(record, by_id.get(record.id.as_str()).copied(), runtime));
    }
    for record in &inventory.vms {
        if record.id.is_empty() {
            tracing::warn!(
                operation = "normalize",
                name = %record.name,
                "skipping VM record with empty id"
            );
            continue;
        }
        entries.push(vm_entry(record));
    }
    entries
}

fn container_entry(
    record: &ContainerRecord,
    runtime_record: Option<&RuntimeRecord>,
    runtime: &[RuntimeRecord],
) -> ServiceEntry {
    let name = record
        .names
        .first()
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| record.id.clone());

    let (mode, facts) = match runtime_record {
        Some(r) => {
            let mode = NetworkMode::from_raw(&r.network_mode);
            let facts = match &mode {
                NetworkMode::ContainerShared(target) => shared_facts(target, runtime),
                _ => NetworkFacts {
                    addresses: r.addresses.clone(),
                    ports: r.ports.clone(),
                },
            };
            (mode, facts)
        }
        None => (NetworkMode::Unknown, NetworkFacts::default()),
    };

    ServiceEntry {
        id: record.id.clone(),
        kind: ServiceKind::Container,
        name,
        run_state: RunState::from_raw(&record.state),
        image: record.image.clone(),
        icon_ref: record.labels.get(ICON_LABEL).cloned(),
        network_mode: Some(mode),
        web_ui_template: record.labels.get(WEBUI_LABEL).cloned(),
        network_facts: facts,
        resolved_url: None,
    }
}

fn vm_entry(record: &VmRecord) -> ServiceEntry {
    let name = if record.name.is_empty() {
        record.id.clone()
    } else {
        record.name.clone()
    };
    ServiceEntry {
        id: record.id.clone(),
        kind: ServiceKind::VirtualMachine,
        name,
        run_state: RunState::from_raw(&record.state),
        image: None,
        icon_ref: None,
        network_mode: None,
        web_ui_template: None,
        network_facts: NetworkFacts::default(),
        resolved_url: None,
    }
}

/// Facts for an entry that shares another container's network namespace.
/// Inheritance is bounded to one hop: a target that itself points at a third
/// container (or back at the first) yields empty facts, so resolution fails
/// closed instead of chasing the chain.
fn shared_facts(target: &str, runtime: &[RuntimeRecord]) -> NetworkFacts {
    let Some(target_record) = lookup_target(target, runtime) else {
        return NetworkFacts::default();
    };
    if target_record
        .network_mode
        .trim()
        .starts_with("container:")
    {
        return NetworkFacts::default();
    }
    NetworkFacts {
        addresses: target_record.addresses.clone(),
        ports: target_record.ports.clone(),
    }
}

/// Engine `container:` references may use a full id, a short id, or a name.
fn lookup_target<'a>(target: &str, runtime: &'a [RuntimeRecord]) -> Option<&'a RuntimeRecord> {
    if let Some(record) = runtime.iter().find(|r| r.id == target) {
        return Some(record);
    }
    if target.len() >= 12 {
        if let Some(record) = runtime.iter().find(|r| r.id.starts_with(target)) {
            return Some(record);
        }
    }
    runtime.iter().find(|r| r.name == target)
}
