//! In-memory slot state backend.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{LotState, ParkingError, SlotBackend};

/// Keeps the last saved state in memory. Clones share the same storage, so a
/// test can hold one handle and reopen a store from another to simulate a
/// restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    saved: Arc<Mutex<Option<LotState>>>,
    saves: Arc<Mutex<usize>>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved state.
    pub fn saved(&self) -> Option<LotState> {
        self.saved.lock().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl SlotBackend for InMemoryBackend {
    fn load(&mut self) -> Result<Option<LotState>, ParkingError> {
        Ok(self.saved.lock().clone())
    }

    fn save(&mut self, state: &LotState) -> Result<(), ParkingError> {
        *self.saved.lock() = Some(state.clone());
        *self.saves.lock() += 1;
        Ok(())
    }
}
