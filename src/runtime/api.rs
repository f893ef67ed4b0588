//! Transport-agnostic operations offered to the HTTP layer.
//!
//! `ParkingLot` owns the static graph, the slot store and the credential
//! registry. Reads go through store snapshots; every mutation goes through
//! the store's single commit path. Mutating calls take `now_ms` so callers
//! (and tests) control the clock; pass [`crate::util::clock::now_ms`] in
//! production.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{
    allocate_nearest, authorize, k_shortest_paths, Allocation, ArchivedBooking, BookingRequest,
    CredentialRegistry, GateDecision, GraphExport, LotGraph, ParkingError, Route, Slot,
    SlotCounts, SlotStatus, SlotStore,
};
use crate::util::serde::{NodeId, SlotId, TimestampMs};

/// Health response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Slot counts per status.
    pub slots: SlotCounts,
}

/// The parking core as one service object.
pub struct ParkingLot {
    graph: LotGraph,
    store: SlotStore,
    credentials: CredentialRegistry,
    entrance: NodeId,
}

impl ParkingLot {
    /// Assemble from parts. See [`crate::builders::LotBuilder`] for building
    /// from configuration.
    pub fn new(
        graph: LotGraph,
        store: SlotStore,
        credentials: CredentialRegistry,
        entrance: impl Into<NodeId>,
    ) -> Self {
        Self {
            graph,
            store,
            credentials,
            entrance: entrance.into(),
        }
    }

    /// The lot topology.
    pub const fn graph(&self) -> &LotGraph {
        &self.graph
    }

    /// The slot state store.
    pub const fn store(&self) -> &SlotStore {
        &self.store
    }

    /// Default start node for allocation and gate decisions.
    pub fn entrance(&self) -> &str {
        &self.entrance
    }

    /// Full graph export.
    pub fn get_layout(&self) -> GraphExport {
        self.graph.export()
    }

    /// Current slot map.
    pub fn get_slots(&self) -> BTreeMap<SlotId, Slot> {
        self.store.snapshot()
    }

    /// Sensor or operator status push.
    pub fn update_slot_status(
        &self,
        slot_id: &str,
        status: SlotStatus,
        force: bool,
        now_ms: TimestampMs,
    ) -> Result<Slot, ParkingError> {
        self.store.update_status(slot_id, status, force, now_ms)
    }

    /// Nearest free slot from `start`; `None` means no availability.
    pub fn allocate_nearest(&self, start: &str) -> Result<Option<Allocation>, ParkingError> {
        allocate_nearest(&self.graph, &self.store.snapshot(), start)
    }

    /// Up to `k` simple routes between two nodes, cheapest first.
    pub fn get_alternate_routes(
        &self,
        start: &str,
        end: &str,
        k: usize,
    ) -> Result<Vec<Route>, ParkingError> {
        k_shortest_paths(&self.graph, start, end, k)
    }

    /// Book a free slot.
    pub fn book(
        &self,
        slot_id: &str,
        request: BookingRequest,
        now_ms: TimestampMs,
    ) -> Result<Slot, ParkingError> {
        self.store.book(slot_id, request, now_ms)
    }

    /// Cancel whatever holds the slot and force it free.
    pub fn cancel(&self, slot_id: &str, now_ms: TimestampMs) -> Result<Slot, ParkingError> {
        self.store.cancel(slot_id, now_ms)
    }

    /// Release bookings that ended at or before `now_ms`.
    pub fn sweep_expired(&self, now_ms: TimestampMs) -> Result<Vec<SlotId>, ParkingError> {
        self.store.sweep_expired(now_ms)
    }

    /// Gate decision for a credential presented at the entrance.
    pub fn authorize(&self, credential: &str) -> Result<GateDecision, ParkingError> {
        self.authorize_from(credential, &self.entrance)
    }

    /// Gate decision for a credential presented at `start`.
    pub fn authorize_from(&self, credential: &str, start: &str) -> Result<GateDecision, ParkingError> {
        authorize(&self.graph, &self.store, &self.credentials, credential, start)
    }

    /// Force every slot free.
    pub fn reset_all(&self, now_ms: TimestampMs) -> Result<usize, ParkingError> {
        self.store.reset_all(now_ms)
    }

    /// Archived bookings, oldest first.
    pub fn history(&self) -> Vec<ArchivedBooking> {
        self.store.history()
    }

    /// Health payload.
    pub fn health(&self) -> Health {
        Health {
            ok: true,
            slots: self.store.counts(),
        }
    }
}
