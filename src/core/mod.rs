//! Routing engines, slot state machine and gate decisions.

pub mod allocator;
pub mod audit;
pub mod error;
pub mod gate;
pub mod graph;
pub mod k_paths;
pub mod shortest_path;
pub mod slot_store;

pub use allocator::{allocate_nearest, Allocation};
pub use audit::{
    build_audit_event, build_audit_event_at, AuditEvent, AuditSink, InMemoryAuditSink,
    TracingAuditSink,
};
pub use error::{AppResult, ParkingError};
pub use gate::{authorize, CredentialRegistry, GateDecision, Vehicle};
pub use graph::{GraphExport, LotGraph, Neighbor, Node, NodeKind, Position};
pub use k_paths::k_shortest_paths;
pub use shortest_path::{reconstruct_path, shortest_paths, shortest_route, Route, ShortestPaths};
pub use slot_store::{
    ArchiveReason, ArchivedBooking, BookingDetails, BookingRequest, LotState, Slot, SlotBackend,
    SlotCounts, SlotStatus, SlotStore, DEFAULT_HISTORY_CAP,
};
