//! Nearest-free-slot allocation.
//!
//! Allocation is a recommendation only: nothing is reserved while the path is
//! computed. A caller that goes on to book the slot may lose it to a
//! concurrent booking; `SlotStore::book` re-checks `Free` at commit time and
//! the caller is expected to allocate again.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::{shortest_paths, LotGraph, ParkingError, Slot, SlotStatus};
use crate::util::serde::{natural_slot_order, NodeId, SlotId};

/// Recommended slot with the route to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Chosen slot.
    pub slot_id: SlotId,
    /// Route weight from the start node.
    pub distance: f64,
    /// Ordered node ids from the start node to the slot.
    pub path: Vec<NodeId>,
}

/// Pick the free slot closest to `start`.
///
/// Occupied and booked slots stay traversable; only their use as a
/// destination is ruled out. Equal distances resolve to the lowest slot
/// number. `Ok(None)` means no free slot is reachable.
pub fn allocate_nearest(
    graph: &LotGraph,
    slots: &BTreeMap<SlotId, Slot>,
    start: &str,
) -> Result<Option<Allocation>, ParkingError> {
    if !graph.contains(start) {
        return Err(ParkingError::NotFound(format!("node `{start}`")));
    }

    let mut free: Vec<&SlotId> = slots
        .values()
        .filter(|s| s.status == SlotStatus::Free)
        .map(|s| &s.id)
        .collect();
    if free.is_empty() {
        tracing::info!(start, "no free slots");
        return Ok(None);
    }
    free.sort_by(|a, b| natural_slot_order(a, b));

    let paths = shortest_paths(graph, start, &HashSet::new())?;

    let mut best: Option<(&SlotId, f64)> = None;
    for id in free {
        let Some(d) = paths.distance(id) else { continue };
        if best.is_none_or(|(_, b)| d < b) {
            best = Some((id, d));
        }
    }

    let Some((slot_id, distance)) = best else {
        tracing::warn!(start, "free slots exist but none is reachable");
        return Ok(None);
    };
    let Some(path) = paths.path_to(slot_id) else {
        return Ok(None);
    };
    tracing::debug!(start, slot_id = %slot_id, distance, "nearest free slot");
    Ok(Some(Allocation {
        slot_id: slot_id.clone(),
        distance,
        path,
    }))
}
