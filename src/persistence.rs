//! JSON persistence for the timer record and the user settings.

use crate::models::{Settings, TimerRecord};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

const STATE_FILE_NAME: &str = "state.json";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to replace state file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Why a fresh record was handed out instead of the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshReason {
    /// Nothing stored yet.
    Missing,
    /// The file exists but could not be read.
    Unreadable,
    /// The file was read but did not decode.
    Corrupt,
}

/// Result of loading the state file. Loading never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(TimerRecord),
    Fresh {
        record: TimerRecord,
        reason: FreshReason,
    },
}

impl LoadOutcome {
    pub fn into_record(self) -> TimerRecord {
        match self {
            Self::Loaded(record) | Self::Fresh { record, .. } => record,
        }
    }
}

/// Stores the single timer record at a fixed path.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the per-user default location.
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    /// The session runtime directory when there is one, so the state lives
    /// as long as the login session; otherwise the local data directory.
    pub fn default_path() -> PathBuf {
        match project_dirs() {
            Some(dirs) => dirs
                .runtime_dir()
                .unwrap_or_else(|| dirs.data_local_dir())
                .join(STATE_FILE_NAME),
            None => std::env::temp_dir().join("pomobar_state.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored record, falling back to a fresh one.
    pub fn load(&self) -> LoadOutcome {
        let fresh = |reason| LoadOutcome::Fresh {
            record: TimerRecord::default(),
            reason,
        };

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file, starting fresh");
                return fresh(FreshReason::Missing);
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable state file, reinitializing");
                return fresh(FreshReason::Unreadable);
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => LoadOutcome::Loaded(record),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt state file, reinitializing");
                fresh(FreshReason::Corrupt)
            }
        }
    }

    /// Stamps the record with `now`, the invocation's clock reading, and
    /// atomically replaces the stored copy.
    pub fn save(
        &self,
        record: &mut TimerRecord,
        now: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        record.last_update = now;
        let json = serde_json::to_string_pretty(record)?;
        atomic_write(&self.path, &json)?;
        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}

/// Default location of the settings file.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Loads settings, returning defaults if the file is absent or invalid.
pub fn load_settings(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Settings::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
            return Settings::default();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "invalid config, using defaults");
        Settings::default()
    })
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "pomobar", "Pomobar")
}

/// Writes to a temp file in the target directory, syncs it, then renames it
/// over the target.
fn atomic_write(path: &Path, content: &str) -> Result<(), PersistenceError> {
    let io_err = |source: io::Error| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut temp_file = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp_file.write_all(content.as_bytes()).map_err(io_err)?;
    temp_file.as_file().sync_all().map_err(io_err)?;
    temp_file.persist(path)?;
    Ok(())
}
