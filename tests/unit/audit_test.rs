//! Tests for audit sinks

use parking_allocator::core::{
    build_audit_event, build_audit_event_at, AuditSink, InMemoryAuditSink, TracingAuditSink,
};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event("S1", "book", Some("ABC-1234".to_string()));
    sink.record(event);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].slot_id, "S1");
    assert_eq!(events[0].action, "book");
    assert_eq!(events[0].payload.as_deref(), Some("ABC-1234"));
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("S1", "book", None));
    sink.record(build_audit_event("S2", "book", None));
    sink.record(build_audit_event("S3", "book", None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].slot_id, "S2"); // First one popped
    assert_eq!(events[1].slot_id, "S3");
}

#[test]
fn test_build_audit_event() {
    let a = build_audit_event("S5", "expire", None);
    let b = build_audit_event("S5", "expire", None);

    assert_eq!(a.slot_id, "S5");
    assert_eq!(a.action, "expire");
    assert!(a.payload.is_none());
    assert!(a.created_at_ms > 0);
    assert_ne!(a.event_id, b.event_id);
}

#[test]
fn test_tracing_audit_sink_accepts_events() {
    parking_allocator::util::init_tracing();
    let mut sink = TracingAuditSink;
    sink.record(build_audit_event("S7", "expire", None));
}

#[test]
fn test_build_audit_event_at_keeps_given_time() {
    let event = build_audit_event_at("S2", "cancel", None, 1_700_000_000_123);
    assert_eq!(event.created_at_ms, 1_700_000_000_123);
    assert_eq!(event.action, "cancel");
}
