//! Tests for configuration validation

use parking_allocator::config::{EdgeSpec, LayoutConfig, LotConfig, NodeSpec, StoreBackendConfig};
use parking_allocator::core::{NodeKind, Position};

fn tiny_layout() -> LayoutConfig {
    LayoutConfig {
        nodes: vec![
            NodeSpec {
                id: "GATE".into(),
                kind: NodeKind::Entrance,
                name: "Gate".into(),
                position: Position::default(),
            },
            NodeSpec {
                id: "P1".into(),
                kind: NodeKind::Slot,
                name: "Bay 1".into(),
                position: Position::new(1.0, 0.0),
            },
        ],
        edges: vec![EdgeSpec {
            from: "GATE".into(),
            to: "P1".into(),
            weight: 2.5,
        }],
    }
}

#[test]
fn test_lot_config_validation() {
    let cfg = LotConfig {
        layout: tiny_layout(),
        entrance: "GATE".into(),
        ..LotConfig::default()
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_lot_config_invalid_sweep_interval() {
    let cfg = LotConfig {
        sweep_interval_secs: 0,
        ..LotConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_lot_config_unknown_entrance() {
    let cfg = LotConfig {
        entrance: "BACK_DOOR".into(),
        ..LotConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.contains("BACK_DOOR"));
}

#[test]
fn test_layout_duplicate_node() {
    let mut layout = tiny_layout();
    layout.nodes.push(layout.nodes[1].clone());
    assert!(layout.validate().unwrap_err().contains("duplicate"));
}

#[test]
fn test_layout_without_slots() {
    let mut layout = tiny_layout();
    layout.nodes.retain(|n| n.kind != NodeKind::Slot);
    layout.edges.clear();
    assert!(layout.validate().is_err());
}

#[test]
fn test_layout_non_positive_weight() {
    let mut layout = tiny_layout();
    layout.edges[0].weight = 0.0;
    assert!(layout.validate().is_err());
}

#[test]
fn test_lot_config_from_json() {
    let json = r#"{
        "layout": {
            "nodes": [
                { "id": "GATE", "type": "ENTRANCE", "name": "Gate", "position": { "x": 0, "y": 0 } },
                { "id": "P1", "type": "SLOT", "name": "Bay 1" }
            ],
            "edges": [ { "from": "GATE", "to": "P1", "weight": 4 } ]
        },
        "credentials": {
            "TAG1": { "owner": "Ana", "plate": "AB-123", "class": "General" }
        },
        "store": { "kind": "file", "dir": "/tmp/parking" },
        "sweep_interval_secs": 30,
        "entrance": "GATE"
    }"#;

    let cfg = LotConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.sweep_interval_secs, 30);
    assert_eq!(cfg.credentials.len(), 1);
    assert_eq!(cfg.layout.nodes[1].position, Position::default());
    assert!(matches!(cfg.store, StoreBackendConfig::File { .. }));
}

#[test]
fn test_lot_config_json_defaults() {
    let cfg = LotConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, LotConfig::default());
    assert_eq!(cfg.credentials.len(), 3);
}

#[test]
fn test_lot_config_rejects_bad_json() {
    assert!(LotConfig::from_json_str(r#"{"sweep_interval_secs": "soon"}"#).is_err());
}

#[test]
fn test_lot_config_from_env_overrides() {
    let dir = std::env::temp_dir().join("parking-env-test");
    std::env::remove_var("PARKING_CONFIG");
    std::env::set_var("PARKING_SWEEP_SECS", "15");
    std::env::set_var("PARKING_STATE_DIR", &dir);

    let cfg = LotConfig::from_env();

    std::env::remove_var("PARKING_SWEEP_SECS");
    std::env::remove_var("PARKING_STATE_DIR");

    let cfg = cfg.unwrap();
    assert_eq!(cfg.sweep_interval_secs, 15);
    assert_eq!(
        cfg.store,
        StoreBackendConfig::File {
            dir,
            stream: "slots".into()
        }
    );
}
