//! Tests for slot state backends

use parking_allocator::core::{BookingRequest, LotState, SlotBackend, SlotStatus, SlotStore};
use parking_allocator::infra::{InMemoryBackend, JsonFileBackend};

const NOW: u128 = 1_700_000_000_000;

fn slot_ids() -> Vec<String> {
    (1..=4).map(|i| format!("S{i}")).collect()
}

fn booking(plate: &str) -> BookingRequest {
    BookingRequest {
        vehicle_type: "car".into(),
        vehicle_number: plate.into(),
        start_ms: NOW,
        end_ms: NOW + 90 * 60 * 1000,
        billed_hours: 2,
        cost: 100.0,
    }
}

#[test]
fn test_in_memory_restart_restores_state() {
    let backend = InMemoryBackend::new();
    {
        let store = SlotStore::open(&slot_ids(), Box::new(backend.clone()), NOW).unwrap();
        store.book("S2", booking("AB-1"), NOW).unwrap();
        store.update_status("S3", SlotStatus::Occupied, false, NOW).unwrap();
    }
    let store = SlotStore::open(&slot_ids(), Box::new(backend), NOW + 5).unwrap();
    assert_eq!(store.slot("S2").unwrap().status, SlotStatus::Booked);
    assert_eq!(store.slot("S3").unwrap().status, SlotStatus::Occupied);
    assert_eq!(store.slot("S1").unwrap().last_updated_ms, NOW);
}

#[test]
fn test_file_round_trip_is_exact() {
    let dir = std::env::temp_dir().join(format!("parking-store-{}", uuid::Uuid::new_v4()));
    let backend = JsonFileBackend::new(&dir, "slots").unwrap();
    let store = SlotStore::open(&slot_ids(), Box::new(backend), NOW).unwrap();
    store.book("S1", booking("AB-1"), NOW + 1).unwrap();
    store.book("S4", booking("CD-2"), NOW + 2).unwrap();
    store.cancel("S4", NOW + 3).unwrap();
    store.update_status("S2", SlotStatus::Occupied, false, NOW + 4).unwrap();
    let before: LotState = store.state();
    drop(store);

    let mut reopened = JsonFileBackend::new(&dir, "slots").unwrap();
    let loaded = reopened.load().unwrap().unwrap();
    assert_eq!(loaded, before);
    assert_eq!(loaded.history.len(), 1);

    let restored = SlotStore::open(&slot_ids(), Box::new(reopened), NOW + 10).unwrap();
    assert_eq!(restored.state(), before);
    let _ = std::fs::remove_dir_all(dir);
}
