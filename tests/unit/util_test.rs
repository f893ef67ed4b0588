//! Tests for utility functions

use parking_allocator::util::{natural_slot_order, now_ms, HOUR_MS, MINUTE_MS};

#[test]
fn test_time_constants() {
    assert_eq!(MINUTE_MS, 60_000);
    assert_eq!(HOUR_MS, 60 * MINUTE_MS);
}

#[test]
fn test_now_ms_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_slot_ids_sort_numerically() {
    let mut ids = vec!["S10", "S2", "S1", "S9"];
    ids.sort_by(|a, b| natural_slot_order(a, b));
    assert_eq!(ids, vec!["S1", "S2", "S9", "S10"]);
}

#[test]
fn test_init_tracing_is_idempotent() {
    parking_allocator::util::init_tracing();
    parking_allocator::util::init_tracing();
    tracing::info!("tracing initialized");
}
