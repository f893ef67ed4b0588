//! Error types for routing, allocation and slot state operations.

use thiserror::Error;

use crate::util::serde::{NodeId, TimestampMs};

/// Errors produced by the parking core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParkingError {
    /// Referenced slot or node id does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Slot is not free for booking, or no free slot could be reached.
    #[error("slot unavailable: {0}")]
    SlotUnavailable(String),
    /// Booking end time is not strictly after the booking time.
    #[error("invalid time window: end {end_ms} is not after {now_ms}")]
    InvalidTimeWindow {
        /// Requested end of the booking.
        end_ms: TimestampMs,
        /// Time the booking was attempted, or the requested start if later.
        now_ms: TimestampMs,
    },
    /// Credential presented at the gate is not registered.
    #[error("unauthorized credential")]
    Unauthorized,
    /// Durable write did not complete; the mutation was not committed.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
    /// No path exists between two nodes.
    #[error("unreachable: no path from {from} to {to}")]
    Unreachable {
        /// Query start node.
        from: NodeId,
        /// Query target node.
        to: NodeId,
    },
    /// Topology description is malformed (construction-time error).
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    /// Booking request carries a value that cannot be stored.
    #[error("invalid booking: {0}")]
    InvalidBooking(String),
    /// Requested status change cannot be applied as a plain status push.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
