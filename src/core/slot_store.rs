//! Authoritative slot state: free / occupied / booked, with booking expiry.
//!
//! Every mutation runs under one mutex and follows the same commit path:
//! clone the current state, apply the transition to the clone, persist the
//! clone through the [`SlotBackend`], and only then swap it in. A failed write
//! leaves the in-memory state exactly as it was.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{build_audit_event_at, AuditSink, ParkingError};
use crate::util::serde::{natural_slot_order, SlotId, TimestampMs};

/// Default number of archived bookings retained.
pub const DEFAULT_HISTORY_CAP: usize = 256;

/// Occupancy status of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    /// Available for allocation and booking.
    Free,
    /// A vehicle is physically present.
    Occupied,
    /// Reserved by a booking.
    Booked,
}

/// Caller-supplied part of a booking. Pricing happens before this point;
/// `billed_hours` and `cost` are stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Vehicle class (car, bike, ...).
    pub vehicle_type: String,
    /// Registration plate.
    pub vehicle_number: String,
    /// Requested start of the booking window.
    pub start_ms: TimestampMs,
    /// Requested end of the booking window.
    pub end_ms: TimestampMs,
    /// Hours billed for the window.
    pub billed_hours: u32,
    /// Amount charged.
    pub cost: f64,
}

/// Booking attached to a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    /// Unique booking id.
    pub booking_id: Uuid,
    /// Vehicle class.
    pub vehicle_type: String,
    /// Registration plate.
    pub vehicle_number: String,
    /// Start of the booking window.
    pub start_ms: TimestampMs,
    /// End of the booking window.
    pub end_ms: TimestampMs,
    /// Hours billed.
    pub billed_hours: u32,
    /// Amount charged.
    pub cost: f64,
    /// When the booking was committed.
    pub booked_at_ms: TimestampMs,
    /// When the expiry sweep releases the slot.
    pub expires_at_ms: TimestampMs,
}

/// A slot and its mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Slot id (same as its graph node id).
    pub id: SlotId,
    /// Current status.
    pub status: SlotStatus,
    /// Time of the last committed change.
    pub last_updated_ms: TimestampMs,
    /// Present while booked, and while the booked vehicle is parked.
    pub booking: Option<BookingDetails>,
}

impl Slot {
    fn free(id: SlotId, now_ms: TimestampMs) -> Self {
        Self {
            id,
            status: SlotStatus::Free,
            last_updated_ms: now_ms,
            booking: None,
        }
    }
}

/// Why a booking left its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveReason {
    /// Released by the expiry sweep.
    Expired,
    /// Cancelled by the customer or an operator.
    Cancelled,
    /// Forced free through a status update.
    ForcedFree,
    /// Vehicle left an occupied slot.
    Released,
    /// Cleared by a lot-wide reset.
    Reset,
}

/// A booking that has been removed from its slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedBooking {
    /// Slot the booking was attached to.
    pub slot_id: SlotId,
    /// The booking as it was.
    pub details: BookingDetails,
    /// Why it was removed.
    pub reason: ArchiveReason,
    /// When it was removed.
    pub archived_at_ms: TimestampMs,
}

/// Slot counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCounts {
    /// Free slots.
    pub free: usize,
    /// Occupied slots.
    pub occupied: usize,
    /// Booked slots.
    pub booked: usize,
}

/// The unit of persistence: every slot plus the booking archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LotState {
    /// Slots keyed by id.
    pub slots: BTreeMap<SlotId, Slot>,
    /// Archived bookings, oldest first.
    #[serde(default)]
    pub history: Vec<ArchivedBooking>,
}

impl LotState {
    /// All `slot_ids` free at `now_ms`.
    pub fn fresh(slot_ids: &[SlotId], now_ms: TimestampMs) -> Self {
        Self {
            slots: slot_ids
                .iter()
                .map(|id| (id.clone(), Slot::free(id.clone(), now_ms)))
                .collect(),
            history: Vec::new(),
        }
    }

    /// Merge a persisted snapshot with the current layout's slot ids.
    ///
    /// Slots in both keep their persisted state, new layout slots start free,
    /// persisted slots missing from the layout are dropped.
    pub fn reconcile(persisted: Self, slot_ids: &[SlotId], now_ms: TimestampMs) -> Self {
        let mut slots = persisted.slots;
        let mut state = Self {
            slots: BTreeMap::new(),
            history: persisted.history,
        };
        for id in slot_ids {
            let slot = slots
                .remove(id)
                .unwrap_or_else(|| Slot::free(id.clone(), now_ms));
            state.slots.insert(id.clone(), slot);
        }
        for id in slots.keys() {
            tracing::warn!(slot_id = %id, "dropping persisted slot absent from layout");
        }
        state
    }

    /// Count slots per status.
    pub fn counts(&self) -> SlotCounts {
        self.slots
            .values()
            .fold(SlotCounts::default(), |mut acc, slot| {
                match slot.status {
                    SlotStatus::Free => acc.free += 1,
                    SlotStatus::Occupied => acc.occupied += 1,
                    SlotStatus::Booked => acc.booked += 1,
                }
                acc
            })
    }

    fn slot_mut(&mut self, slot_id: &str) -> Result<&mut Slot, ParkingError> {
        self.slots
            .get_mut(slot_id)
            .ok_or_else(|| ParkingError::NotFound(format!("slot `{slot_id}`")))
    }

    fn archive(
        &mut self,
        slot_id: &str,
        details: BookingDetails,
        reason: ArchiveReason,
        now_ms: TimestampMs,
        cap: usize,
    ) {
        self.history.push(ArchivedBooking {
            slot_id: slot_id.to_owned(),
            details,
            reason,
            archived_at_ms: now_ms,
        });
        if self.history.len() > cap {
            let excess = self.history.len() - cap;
            self.history.drain(..excess);
        }
    }
}

/// Abstraction for durable storage of the slot map.
pub trait SlotBackend: Send {
    /// Load the last committed state, if any.
    fn load(&mut self) -> Result<Option<LotState>, ParkingError>;
    /// Durably replace the stored state.
    fn save(&mut self, state: &LotState) -> Result<(), ParkingError>;
}

struct StoreInner {
    state: LotState,
    backend: Box<dyn SlotBackend>,
}

/// Change applied to a cloned state; `changed == false` skips persistence.
struct Applied<T> {
    out: T,
    changed: bool,
    events: Vec<(SlotId, &'static str, Option<String>)>,
}

impl<T> Applied<T> {
    const fn unchanged(out: T) -> Self {
        Self {
            out,
            changed: false,
            events: Vec::new(),
        }
    }
}

/// Serialized owner of every slot's state.
pub struct SlotStore {
    inner: Mutex<StoreInner>,
    audit: Option<Mutex<Box<dyn AuditSink>>>,
    history_cap: usize,
}

impl SlotStore {
    /// Open the store for `slot_ids`, restoring and reconciling any persisted
    /// state, then writing the reconciled state back.
    pub fn open(
        slot_ids: &[SlotId],
        mut backend: Box<dyn SlotBackend>,
        now_ms: TimestampMs,
    ) -> Result<Self, ParkingError> {
        let state = match backend.load()? {
            Some(persisted) => {
                tracing::info!(slots = persisted.slots.len(), "restored persisted slot state");
                LotState::reconcile(persisted, slot_ids, now_ms)
            }
            None => LotState::fresh(slot_ids, now_ms),
        };
        backend.save(&state)?;
        Ok(Self {
            inner: Mutex::new(StoreInner { state, backend }),
            audit: None,
            history_cap: DEFAULT_HISTORY_CAP,
        })
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Mutex::new(audit));
        self
    }

    /// Bound the booking archive.
    #[must_use]
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap;
        self
    }

    /// Copy of the full slot map.
    pub fn snapshot(&self) -> BTreeMap<SlotId, Slot> {
        self.inner.lock().state.slots.clone()
    }

    /// Copy of the full persisted state.
    pub fn state(&self) -> LotState {
        self.inner.lock().state.clone()
    }

    /// Copy of one slot.
    pub fn slot(&self, slot_id: &str) -> Result<Slot, ParkingError> {
        self.inner
            .lock()
            .state
            .slots
            .get(slot_id)
            .cloned()
            .ok_or_else(|| ParkingError::NotFound(format!("slot `{slot_id}`")))
    }

    /// Archived bookings, oldest first.
    pub fn history(&self) -> Vec<ArchivedBooking> {
        self.inner.lock().state.history.clone()
    }

    /// Slot counts per status.
    pub fn counts(&self) -> SlotCounts {
        self.inner.lock().state.counts()
    }

    /// First booked slot (in slot-number order) whose booking belongs to
    /// `vehicle_number`. Plates compare trimmed and ASCII case-insensitive.
    pub fn find_booking_for(&self, vehicle_number: &str) -> Option<Slot> {
        let wanted = vehicle_number.trim();
        let inner = self.inner.lock();
        let mut matches: Vec<&Slot> = inner
            .state
            .slots
            .values()
            .filter(|s| s.status == SlotStatus::Booked)
            .filter(|s| {
                s.booking
                    .as_ref()
                    .is_some_and(|b| b.vehicle_number.trim().eq_ignore_ascii_case(wanted))
            })
            .collect();
        matches.sort_by(|a, b| natural_slot_order(&a.id, &b.id));
        matches.first().map(|s| (*s).clone())
    }

    /// Apply a sensor or operator status push.
    ///
    /// A non-forced `Free` on a booked slot is ignored so a stray sensor
    /// reading cannot clobber a reservation. `Occupied` always applies and
    /// keeps any booking (the booked vehicle has arrived). `Booked` cannot be
    /// set without details; use [`SlotStore::book`].
    pub fn update_status(
        &self,
        slot_id: &str,
        status: SlotStatus,
        force: bool,
        now_ms: TimestampMs,
    ) -> Result<Slot, ParkingError> {
        if status == SlotStatus::Booked {
            return Err(ParkingError::InvalidTransition(format!(
                "slot `{slot_id}` can only become BOOKED through a booking"
            )));
        }
        let cap = self.history_cap;
        self.commit(now_ms, |state| {
            let slot = state.slot_mut(slot_id)?;
            let current = slot.status;

            if current == SlotStatus::Booked && status == SlotStatus::Free && !force {
                tracing::debug!(slot_id, "ignoring unforced FREE on booked slot");
                return Ok(Applied::unchanged(slot.clone()));
            }
            // Same status with nothing to release.
            if current == status && (status != SlotStatus::Free || slot.booking.is_none()) {
                tracing::trace!(slot_id, status = ?status, "status unchanged");
                return Ok(Applied::unchanged(slot.clone()));
            }

            slot.status = status;
            slot.last_updated_ms = now_ms;
            let mut archived = None;
            if status == SlotStatus::Free {
                archived = slot.booking.take();
            }
            let out = slot.clone();

            if let Some(details) = archived {
                let reason = if current == SlotStatus::Booked {
                    ArchiveReason::ForcedFree
                } else {
                    ArchiveReason::Released
                };
                state.archive(slot_id, details, reason, now_ms, cap);
            }
            tracing::info!(slot_id, from = ?current, to = ?status, force, "slot status updated");
            Ok(Applied {
                out,
                changed: true,
                events: vec![(slot_id.to_owned(), "status", Some(format!("{current:?}->{status:?}")))],
            })
        })
    }

    /// Book a free slot. The end of the window must be strictly after both
    /// `now_ms` and the requested start, and the cost must be a finite,
    /// non-negative amount.
    pub fn book(
        &self,
        slot_id: &str,
        request: BookingRequest,
        now_ms: TimestampMs,
    ) -> Result<Slot, ParkingError> {
        if !request.cost.is_finite() || request.cost < 0.0 {
            tracing::warn!(slot_id, cost = request.cost, "rejecting booking cost");
            return Err(ParkingError::InvalidBooking(format!(
                "cost {} must be a finite non-negative amount",
                request.cost
            )));
        }
        let floor = now_ms.max(request.start_ms);
        if request.end_ms <= floor {
            tracing::warn!(slot_id, end_ms = %request.end_ms, now_ms = %floor, "rejecting booking window");
            return Err(ParkingError::InvalidTimeWindow {
                end_ms: request.end_ms,
                now_ms: floor,
            });
        }
        self.commit(now_ms, |state| {
            let slot = state.slot_mut(slot_id)?;
            if slot.status != SlotStatus::Free {
                tracing::warn!(slot_id, status = ?slot.status, "booking rejected: slot not free");
                return Err(ParkingError::SlotUnavailable(format!(
                    "slot `{slot_id}` is {:?}",
                    slot.status
                )));
            }
            let details = BookingDetails {
                booking_id: Uuid::new_v4(),
                vehicle_type: request.vehicle_type,
                vehicle_number: request.vehicle_number,
                start_ms: request.start_ms,
                end_ms: request.end_ms,
                billed_hours: request.billed_hours,
                cost: request.cost,
                booked_at_ms: now_ms,
                expires_at_ms: request.end_ms,
            };
            let vehicle = details.vehicle_number.clone();
            slot.status = SlotStatus::Booked;
            slot.last_updated_ms = now_ms;
            slot.booking = Some(details);
            tracing::info!(slot_id, vehicle = %vehicle, "slot booked");
            Ok(Applied {
                out: slot.clone(),
                changed: true,
                events: vec![(slot_id.to_owned(), "book", Some(vehicle))],
            })
        })
    }

    /// Force a slot free, archiving any booking as cancelled. Cancelling a
    /// free slot changes nothing.
    pub fn cancel(&self, slot_id: &str, now_ms: TimestampMs) -> Result<Slot, ParkingError> {
        let cap = self.history_cap;
        self.commit(now_ms, |state| {
            let slot = state.slot_mut(slot_id)?;
            let previous = slot.status;
            if previous == SlotStatus::Free && slot.booking.is_none() {
                return Ok(Applied::unchanged(slot.clone()));
            }
            slot.status = SlotStatus::Free;
            slot.last_updated_ms = now_ms;
            let archived = slot.booking.take();
            let out = slot.clone();
            if let Some(details) = archived {
                state.archive(slot_id, details, ArchiveReason::Cancelled, now_ms, cap);
            }
            tracing::info!(slot_id, from = ?previous, "slot cancelled");
            Ok(Applied {
                out,
                changed: true,
                events: vec![(slot_id.to_owned(), "cancel", None)],
            })
        })
    }

    /// Free every booked slot whose expiry is at or before `now_ms`.
    /// Returns the freed slot ids.
    pub fn sweep_expired(&self, now_ms: TimestampMs) -> Result<Vec<SlotId>, ParkingError> {
        let cap = self.history_cap;
        self.commit(now_ms, |state| {
            let expired: Vec<SlotId> = state
                .slots
                .values()
                .filter(|s| s.status == SlotStatus::Booked)
                .filter(|s| s.booking.as_ref().is_some_and(|b| b.expires_at_ms <= now_ms))
                .map(|s| s.id.clone())
                .collect();

            let mut events = Vec::with_capacity(expired.len());
            for id in &expired {
                let slot = state.slot_mut(id)?;
                slot.status = SlotStatus::Free;
                slot.last_updated_ms = now_ms;
                if let Some(details) = slot.booking.take() {
                    state.archive(id, details, ArchiveReason::Expired, now_ms, cap);
                }
                events.push((id.clone(), "expire", None));
            }
            if !expired.is_empty() {
                tracing::info!(count = expired.len(), slots = ?expired, "expired bookings released");
            }
            Ok(Applied {
                changed: !expired.is_empty(),
                out: expired,
                events,
            })
        })
    }

    /// Force every slot free. Returns how many slots changed.
    pub fn reset_all(&self, now_ms: TimestampMs) -> Result<usize, ParkingError> {
        let cap = self.history_cap;
        self.commit(now_ms, |state| {
            let ids: Vec<SlotId> = state
                .slots
                .values()
                .filter(|s| s.status != SlotStatus::Free || s.booking.is_some())
                .map(|s| s.id.clone())
                .collect();
            for id in &ids {
                let slot = state.slot_mut(id)?;
                slot.status = SlotStatus::Free;
                slot.last_updated_ms = now_ms;
                if let Some(details) = slot.booking.take() {
                    state.archive(id, details, ArchiveReason::Reset, now_ms, cap);
                }
            }
            tracing::warn!(count = ids.len(), "all slots reset");
            let events = ids.iter().map(|id| (id.clone(), "reset", None)).collect();
            Ok(Applied {
                changed: !ids.is_empty(),
                out: ids.len(),
                events,
            })
        })
    }

    /// Apply `f` to a copy of the state, persist, then swap it in.
    ///
    /// Audit events are recorded before the store lock is released, so the
    /// sink sees them in commit order.
    fn commit<T>(
        &self,
        now_ms: TimestampMs,
        f: impl FnOnce(&mut LotState) -> Result<Applied<T>, ParkingError>,
    ) -> Result<T, ParkingError> {
        let mut inner = self.inner.lock();
        let mut next = inner.state.clone();
        let applied = f(&mut next)?;
        if applied.changed {
            if let Err(e) = inner.backend.save(&next) {
                tracing::error!(error = %e, "slot state not committed");
                return Err(e);
            }
            inner.state = next;
            self.record_audit(applied.events, now_ms);
        }
        drop(inner);
        Ok(applied.out)
    }

    fn record_audit(&self, events: Vec<(SlotId, &'static str, Option<String>)>, now_ms: TimestampMs) {
        if let Some(audit) = &self.audit {
            let mut sink = audit.lock();
            for (slot_id, action, payload) in events {
                sink.record(build_audit_event_at(slot_id, action, payload, now_ms));
            }
        }
    }
}
