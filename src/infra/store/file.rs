//! File-backed slot state using a single JSON document.
//!
//! Each save writes the whole state to a sibling temp file, syncs it, and
//! renames it over the live file, so a crash mid-write leaves the previous
//! committed state intact.

use std::fs::{self, create_dir_all, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::core::{LotState, ParkingError, SlotBackend};

/// JSON file backend.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
    stream: String,
}

impl JsonFileBackend {
    /// Create a backend storing `<dir>/<stream>.json`.
    pub fn new(dir: impl AsRef<Path>, stream: impl Into<String>) -> Result<Self, ParkingError> {
        let path = dir.as_ref().to_path_buf();
        create_dir_all(&path).map_err(|e| ParkingError::PersistenceFailure(e.to_string()))?;
        Ok(Self {
            path,
            stream: stream.into(),
        })
    }

    /// Path of the live state file.
    pub fn file_path(&self) -> PathBuf {
        self.path.join(format!("{}.json", self.stream))
    }

    fn temp_path(&self) -> PathBuf {
        self.path.join(format!("{}.json.tmp", self.stream))
    }
}

fn persistence(e: impl std::fmt::Display) -> ParkingError {
    ParkingError::PersistenceFailure(e.to_string())
}

impl SlotBackend for JsonFileBackend {
    fn load(&mut self) -> Result<Option<LotState>, ParkingError> {
        let file_path = self.file_path();
        if !file_path.exists() {
            return Ok(None);
        }
        let file = File::open(&file_path).map_err(persistence)?;
        let state: LotState = serde_json::from_reader(BufReader::new(file)).map_err(persistence)?;
        tracing::debug!(path = %file_path.display(), slots = state.slots.len(), "loaded slot state");
        Ok(Some(state))
    }

    fn save(&mut self, state: &LotState) -> Result<(), ParkingError> {
        let temp_path = self.temp_path();
        let bytes = serde_json::to_vec_pretty(state).map_err(persistence)?;
        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(persistence)?;
            file.write_all(&bytes).map_err(persistence)?;
            file.sync_all().map_err(persistence)?;
        }
        fs::rename(&temp_path, self.file_path()).map_err(persistence)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SlotStatus;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("parking-allocator-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = scratch_dir();
        let mut backend = JsonFileBackend::new(&dir, "slots").unwrap();
        assert!(backend.load().unwrap().is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir();
        let mut backend = JsonFileBackend::new(&dir, "slots").unwrap();
        let mut state = LotState::fresh(&["S1".to_string(), "S2".to_string()], 7);
        state.slots.get_mut("S2").unwrap().status = SlotStatus::Occupied;
        backend.save(&state).unwrap();

        let mut reopened = JsonFileBackend::new(&dir, "slots").unwrap();
        assert_eq!(reopened.load().unwrap(), Some(state));
        assert!(!backend.temp_path().exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_corrupt_file_reports_failure() {
        let dir = scratch_dir();
        let mut backend = JsonFileBackend::new(&dir, "slots").unwrap();
        fs::write(backend.file_path(), b"{not json").unwrap();
        assert!(matches!(
            backend.load(),
            Err(ParkingError::PersistenceFailure(_))
        ));
        let _ = fs::remove_dir_all(dir);
    }
}
