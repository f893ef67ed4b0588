//! Tests for builder modules

use parking_allocator::builders::{build_backend, LotBuilder};
use parking_allocator::config::{LotConfig, StoreBackendConfig};
use parking_allocator::core::{InMemoryAuditSink, SlotStatus};
use parking_allocator::infra::InMemoryBackend;

#[test]
fn test_lot_builder_defaults() {
    let builder = LotBuilder::new(LotConfig::default());
    assert_eq!(builder.config().entrance, "ENTRANCE");
    assert_eq!(builder.config().sweep_interval_secs, 60);

    let lot = builder.build(1_000).unwrap();
    assert_eq!(lot.entrance(), "ENTRANCE");
    assert_eq!(lot.get_slots().len(), 9);
    assert!(lot.get_slots().values().all(|s| s.status == SlotStatus::Free));
    assert_eq!(lot.health().slots.free, 9);
}

#[test]
fn test_lot_builder_uses_supplied_backend() {
    let backend = InMemoryBackend::new();
    let lot = LotBuilder::new(LotConfig::default())
        .with_backend(Box::new(backend.clone()))
        .with_audit(Box::new(InMemoryAuditSink::new(16)))
        .build(1_000)
        .unwrap();

    // Opening writes the reconciled state once.
    assert_eq!(backend.save_count(), 1);
    lot.update_slot_status("S1", SlotStatus::Occupied, false, 2_000).unwrap();
    assert_eq!(backend.save_count(), 2);
    assert_eq!(
        backend.saved().unwrap().slots["S1"].status,
        SlotStatus::Occupied
    );
}

#[test]
fn test_build_file_backend_creates_dir() {
    let dir = std::env::temp_dir().join(format!("parking-builder-{}", uuid::Uuid::new_v4()));
    let cfg = StoreBackendConfig::File {
        dir: dir.clone(),
        stream: "lot".into(),
    };
    assert!(build_backend(&cfg).is_ok());
    assert!(dir.is_dir());
    let _ = std::fs::remove_dir_all(dir);
}
