//! Persistence of the last observed blacklist status.
//!
//! Each run reads the previous status once at start and overwrites it once at
//! the end, so an unfreeze between two runs can be detected. The file holds a
//! single record; there is no history.
//!
//! Saves use an atomic write (write to a temp file, then rename) so a crash
//! mid-write never leaves a truncated file behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// The blacklist status recorded by the previous run.
///
/// # File Format
///
/// ```json
/// {
///   "blocked": false,
///   "checked_at": "2026-10-16 08:30 UTC"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedStatus {
    /// Whether the address was blacklisted at `checked_at`.
    pub blocked: bool,
    /// Check time, formatted as `YYYY-MM-DD HH:MM UTC`. Empty when the file
    /// only records `blocked`.
    #[serde(default)]
    pub checked_at: String,
}

/// Reads and writes the single-record status file.
pub struct StatusStore {
    file_path: PathBuf,
}

impl StatusStore {
    /// Creates a store backed by `file_path`. Nothing is read or written
    /// until [`load`](Self::load) or [`save`](Self::save) is called.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the JSON status file
    ///
    /// # Examples
    ///
    /// ```
    /// use usdt_watcher::persistence::StatusStore;
    ///
    /// let store = StatusStore::new("state.json");
    /// assert_eq!(store.path(), std::path::Path::new("state.json"));
    /// ```
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Returns the path of the status file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads the previous status.
    ///
    /// A missing, unreadable or corrupted file yields `None` with the problem
    /// logged; a first run or a damaged file must never block the report.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use usdt_watcher::persistence::StatusStore;
    ///
    /// let store = StatusStore::new("state.json");
    /// if let Some(previous) = store.load() {
    ///     println!("blocked last time: {}", previous.blocked);
    /// }
    /// ```
    pub fn load(&self) -> Option<PersistedStatus> {
        let path = self.file_path.display();

        if !self.file_path.exists() {
            log::info!("Status file does not exist, no previous status file={}", path);
            return None;
        }

        let data = match fs::read_to_string(&self.file_path) {
            Ok(data) => data,
            Err(e) => {
                log::error!("Failed to read status file file={}: {}", path, e);
                return None;
            }
        };

        match serde_json::from_str::<PersistedStatus>(&data) {
            Ok(status) => {
                log::debug!(
                    "Loaded previous status file={} blocked={} checked_at={}",
                    path,
                    status.blocked,
                    status.checked_at
                );
                Some(status)
            }
            Err(e) => {
                log::error!("Failed to parse status JSON file={}: {}", path, e);
                None
            }
        }
    }

    /// Overwrites the status file with `status`.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::State` if serialization, the temp write or the
    /// rename fails. The temp file is removed on a failed rename.
    pub fn save(&self, status: &PersistedStatus) -> Result<(), MonitorError> {
        let path = self.file_path.display().to_string();
        let state_error = |reason: String| MonitorError::State {
            path: path.clone(),
            reason,
        };

        let data = serde_json::to_string_pretty(status).map_err(|e| state_error(e.to_string()))?;

        let mut temp_path = self.file_path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        fs::write(&temp_path, data).map_err(|e| {
            log::error!("Failed to write temp file file={}: {}", temp_path.display(), e);
            state_error(e.to_string())
        })?;

        if let Err(e) = fs::rename(&temp_path, &self.file_path) {
            log::error!("Failed to rename temp file to {} : {}", path, e);
            let _ = fs::remove_file(&temp_path);
            return Err(state_error(e.to_string()));
        }

        log::debug!("Saved status file={} blocked={}", path, status.blocked);
        Ok(())
    }
}
