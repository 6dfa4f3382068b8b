// Model serialization tests (JSON camelCase, raw-string folding)

use std::collections::BTreeMap;

use svclens::models::*;

fn sample_entry() -> ServiceEntry {
    ServiceEntry {
        id: "c1".into(),
        kind: ServiceKind::Container,
        name: "plex".into(),
        run_state: RunState::Running,
        image: Some("plex:latest".into()),
        icon_ref: Some("https://icons.example/plex.png".into()),
        network_mode: Some(NetworkMode::Bridge),
        web_ui_template: Some("http://[IP]:[PORT:32400]/web".into()),
        network_facts: NetworkFacts {
            addresses: vec!["172.17.0.5".into()],
            ports: [(32400u16, 32400u16)].into_iter().collect::<BTreeMap<_, _>>(),
        },
        resolved_url: Some("http://172.17.0.5:32400/web".into()),
    }
}

#[test]
fn test_service_entry_serialization_camel_case() {
    let entry = sample_entry();
    let json = serde_json::to_string(&entry).unwrap();
    assert!(json.contains("\"runState\""));
    assert!(json.contains("\"iconRef\""));
    assert!(json.contains("\"networkMode\""));
    assert!(json.contains("\"webUiTemplate\""));
    assert!(json.contains("\"networkFacts\""));
    assert!(json.contains("\"resolvedUrl\""));
    let back: ServiceEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entry);
}

#[test]
fn test_network_facts_ports_serialize_as_object() {
    let entry = sample_entry();
    let json = serde_json::to_string(&entry).unwrap();
    // Map keys are JSON strings even for numeric ports.
    assert!(json.contains("\"32400\":32400"));
}

#[test]
fn test_run_state_serde_forms() {
    assert_eq!(serde_json::to_string(&RunState::Running).unwrap(), "\"running\"");
    assert_eq!(serde_json::to_string(&RunState::Stopped).unwrap(), "\"stopped\"");
    assert_eq!(
        serde_json::to_string(&RunState::Other("restarting".into())).unwrap(),
        "{\"other\":\"restarting\"}"
    );
    let back: RunState = serde_json::from_str("\"paused\"").unwrap();
    assert_eq!(back, RunState::Paused);
}

#[test]
fn test_network_mode_serde_forms() {
    assert_eq!(serde_json::to_string(&NetworkMode::Bridge).unwrap(), "\"bridge\"");
    assert_eq!(serde_json::to_string(&NetworkMode::Host).unwrap(), "\"host\"");
    assert_eq!(serde_json::to_string(&NetworkMode::Unknown).unwrap(), "\"unknown\"");
    assert_eq!(
        serde_json::to_string(&NetworkMode::ContainerShared("vpn".into())).unwrap(),
        "{\"containerShared\":\"vpn\"}"
    );
}

#[test]
fn test_run_state_from_raw_folding() {
    assert_eq!(RunState::from_raw("running"), RunState::Running);
    assert_eq!(RunState::from_raw("exited"), RunState::Stopped);
    assert_eq!(RunState::from_raw("stopped"), RunState::Stopped);
    assert_eq!(RunState::from_raw("shutoff"), RunState::Stopped);
    assert_eq!(RunState::from_raw("SHUTOFF"), RunState::Stopped);
    assert_eq!(RunState::from_raw("paused"), RunState::Paused);
    assert_eq!(
        RunState::from_raw("restarting"),
        RunState::Other("restarting".into())
    );
}

#[test]
fn test_network_mode_from_raw_folding() {
    assert_eq!(NetworkMode::from_raw("bridge"), NetworkMode::Bridge);
    assert_eq!(NetworkMode::from_raw("default"), NetworkMode::Bridge);
    assert_eq!(NetworkMode::from_raw("host"), NetworkMode::Host);
    assert_eq!(NetworkMode::from_raw("br0"), NetworkMode::Macvlan);
    assert_eq!(NetworkMode::from_raw("br0.100"), NetworkMode::Macvlan);
    assert_eq!(NetworkMode::from_raw(""), NetworkMode::Unknown);
    assert_eq!(NetworkMode::from_raw("   "), NetworkMode::Unknown);
    assert_eq!(NetworkMode::from_raw("none"), NetworkMode::Unknown);
    // Target references keep their original case.
    assert_eq!(
        NetworkMode::from_raw("container:MyVpn"),
        NetworkMode::ContainerShared("MyVpn".into())
    );
}

#[test]
fn test_snapshot_serialization_camel_case() {
    let snapshot = Snapshot {
        entities: vec![sample_entry()],
        generated_at: 1_700_000_000_000,
        source_health: SourceHealth {
            metadata_ok: true,
            runtime_ok: false,
        },
        metrics: Some(HostMetrics {
            cpu_percent: 12.5,
            mem_bytes_used: 4 * 1024 * 1024 * 1024,
            mem_bytes_total: 16 * 1024 * 1024 * 1024,
            temp_celsius: Some(47.0),
            uptime_seconds: 86_400,
        }),
    };
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"generatedAt\""));
    assert!(json.contains("\"sourceHealth\""));
    assert!(json.contains("\"metadataOk\""));
    assert!(json.contains("\"runtimeOk\""));
    assert!(json.contains("\"cpuPercent\""));
    assert!(json.contains("\"memBytesUsed\""));
    assert!(json.contains("\"memBytesTotal\""));
    assert!(json.contains("\"tempCelsius\""));
    assert!(json.contains("\"uptimeSeconds\""));
    let back: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn test_snapshot_default_is_pre_refresh_empty() {
    let snapshot = Snapshot::default();
    assert!(snapshot.entities.is_empty());
    assert_eq!(snapshot.generated_at, 0);
    assert!(!snapshot.source_health.metadata_ok);
    assert!(!snapshot.source_health.runtime_ok);
    assert_eq!(snapshot.metrics, None);
}

#[test]
fn test_metadata_inventory_tolerates_sparse_json() {
    let inventory: MetadataInventory = serde_json::from_str("{}").unwrap();
    assert!(inventory.containers.is_empty());
    assert!(inventory.vms.is_empty());
    assert_eq!(inventory.metrics, None);

    let record: ContainerRecord = serde_json::from_str("{\"id\":\"c1\"}").unwrap();
    assert_eq!(record.id, "c1");
    assert!(record.names.is_empty());
    assert_eq!(record.image, None);
    assert!(record.state.is_empty());
    assert!(record.labels.is_empty());
}

#[test]
fn test_log_line_json_roundtrip() {
    let line = LogLine {
        timestamp: "2024-01-15 10:30:45".into(),
        message: "server started".into(),
    };
    let json = serde_json::to_string(&line).unwrap();
    assert!(json.contains("\"timestamp\""));
    assert!(json.contains("\"message\""));
    let back: LogLine = serde_json::from_str(&json).unwrap();
    assert_eq!(back, line);
}
