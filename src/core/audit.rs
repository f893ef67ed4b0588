//! Audit sink implementations.
//!
//! One event is recorded per committed slot mutation.

use std::collections::VecDeque;

use uuid::Uuid;

use crate::util::clock::now_ms;
use crate::util::serde::{SlotId, TimestampMs};

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Slot the event concerns.
    pub slot_id: SlotId,
    /// Action taken (book, status, cancel, expire, reset).
    pub action: String,
    /// Timestamp milliseconds.
    pub created_at_ms: TimestampMs,
    /// Additional context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards events to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::info!(
            target: "parking_allocator::audit",
            event_id = %event.event_id,
            slot_id = %event.slot_id,
            action = %event.action,
            payload = ?event.payload,
            "audit"
        );
    }
}

/// Helper to build an audit event stamped with the current time.
pub fn build_audit_event(
    slot_id: impl Into<SlotId>,
    action: impl Into<String>,
    payload: Option<String>,
) -> AuditEvent {
    build_audit_event_at(slot_id, action, payload, now_ms())
}

/// Helper to build an audit event stamped with the time of the operation.
pub fn build_audit_event_at(
    slot_id: impl Into<SlotId>,
    action: impl Into<String>,
    payload: Option<String>,
    created_at_ms: TimestampMs,
) -> AuditEvent {
    AuditEvent {
        event_id: Uuid::new_v4().to_string(),
        slot_id: slot_id.into(),
        action: action.into(),
        created_at_ms,
        payload,
    }
}
