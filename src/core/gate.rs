//! Gate credential check and slot assignment on entry.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::{allocate_nearest, shortest_paths, LotGraph, ParkingError, SlotStore};
use crate::util::serde::{NodeId, SlotId};

/// Vehicle registered to a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Owner name.
    pub owner: String,
    /// Registration plate; matched against booking vehicle numbers.
    pub plate: String,
    /// Membership class (General, VIP, Staff, ...).
    pub class: String,
}

/// Known credentials (RFID tags) and their vehicles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialRegistry {
    vehicles: HashMap<String, Vehicle>,
}

impl CredentialRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a credential.
    pub fn insert(&mut self, credential: impl Into<String>, vehicle: Vehicle) {
        self.vehicles.insert(credential.into(), vehicle);
    }

    /// Vehicle for a credential.
    pub fn lookup(&self, credential: &str) -> Option<&Vehicle> {
        self.vehicles.get(credential)
    }

    /// Number of registered credentials.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether no credential is registered.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

impl FromIterator<(String, Vehicle)> for CredentialRegistry {
    fn from_iter<I: IntoIterator<Item = (String, Vehicle)>>(iter: I) -> Self {
        Self {
            vehicles: iter.into_iter().collect(),
        }
    }
}

/// Outcome for an authorized credential. Opening the gate is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// A slot was found for the vehicle.
    Assigned {
        /// Vehicle behind the credential.
        vehicle: Vehicle,
        /// Assigned slot.
        slot_id: SlotId,
        /// Route weight from the gate.
        distance: f64,
        /// Ordered node ids from the gate to the slot.
        path: Vec<NodeId>,
        /// Whether the slot was already booked for this vehicle.
        prebooked: bool,
    },
    /// Authorized, but no free slot is reachable.
    LotFull {
        /// Vehicle behind the credential.
        vehicle: Vehicle,
    },
}

/// Decide where an arriving vehicle should park.
///
/// Unknown credentials are rejected before any slot state is read. A vehicle
/// holding a booking is routed to that slot; anyone else gets the nearest
/// free slot.
pub fn authorize(
    graph: &LotGraph,
    store: &SlotStore,
    registry: &CredentialRegistry,
    credential: &str,
    start: &str,
) -> Result<GateDecision, ParkingError> {
    let Some(vehicle) = registry.lookup(credential) else {
        tracing::warn!(credential, "gate: unknown credential");
        return Err(ParkingError::Unauthorized);
    };
    let vehicle = vehicle.clone();
    tracing::info!(owner = %vehicle.owner, plate = %vehicle.plate, "gate: credential accepted");

    if let Some(booked) = store.find_booking_for(&vehicle.plate) {
        let paths = shortest_paths(graph, start, &HashSet::new())?;
        if let Some(route) = paths.route_to(&booked.id) {
            tracing::info!(slot_id = %booked.id, plate = %vehicle.plate, "gate: routing to booked slot");
            return Ok(GateDecision::Assigned {
                vehicle,
                slot_id: booked.id,
                distance: route.weight,
                path: route.path,
                prebooked: true,
            });
        }
        tracing::warn!(slot_id = %booked.id, start, "gate: booked slot unreachable, allocating instead");
    }

    match allocate_nearest(graph, &store.snapshot(), start)? {
        Some(allocation) => Ok(GateDecision::Assigned {
            vehicle,
            slot_id: allocation.slot_id,
            distance: allocation.distance,
            path: allocation.path,
            prebooked: false,
        }),
        None => {
            tracing::info!(plate = %vehicle.plate, "gate: lot full");
            Ok(GateDecision::LotFull { vehicle })
        }
    }
}
