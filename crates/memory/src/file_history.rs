//! File-based history store — a bounded JSON array of turns.
//!
//! Storage location defaults to `~/.azcc_history`. The file holds the same
//! pretty-printed JSON array that `export` produces, so an exported file can
//! be pointed at as a history file and vice versa.
//!
//! Saves write a sibling temporary file and rename it over the target, so a
//! crash mid-write loses at most the pending update.

use azcc_core::error::HistoryError;
use azcc_core::history::{parse_turns, retained_tail};
use azcc_core::message::Turn;
use azcc_core::HistoryStore;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file-backed history store keeping at most `max_history` turns.
pub struct FileHistoryStore {
    path: PathBuf,
    max_history: usize,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>, max_history: usize) -> Self {
        Self {
            path: path.into(),
            max_history,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temporary file used while saving.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn save_err(&self, reason: impl std::fmt::Display) -> HistoryError {
        HistoryError::Save {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    /// Read and parse the history file, reporting why it could not be used.
    fn read(&self) -> Result<Vec<Turn>, HistoryError> {
        let load_err = |reason: String| HistoryError::Load {
            path: self.path.clone(),
            reason,
        };
        let content = std::fs::read_to_string(&self.path).map_err(|e| load_err(e.to_string()))?;
        parse_turns(&content).map_err(|e| load_err(e.to_string()))
    }
}

impl HistoryStore for FileHistoryStore {
    fn name(&self) -> &str {
        "file"
    }

    fn max_history(&self) -> usize {
        self.max_history
    }

    fn load(&self) -> Vec<Turn> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No history file yet, starting empty");
            return Vec::new();
        }

        match self.read() {
            Ok(turns) => {
                debug!(path = %self.path.display(), count = turns.len(), "History loaded");
                turns
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable history file");
                Vec::new()
            }
        }
    }

    fn save(&self, history: &[Turn]) -> Result<(), HistoryError> {
        let kept = retained_tail(history, self.max_history);

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| self.save_err(format!("failed to create directory: {e}")))?;
        }

        let json = serde_json::to_string_pretty(kept).map_err(|e| self.save_err(e))?;

        let staging = self.staging_path();
        std::fs::write(&staging, json).map_err(|e| self.save_err(e))?;
        if let Err(e) = std::fs::rename(&staging, &self.path) {
            let _ = std::fs::remove_file(&staging);
            return Err(self.save_err(e));
        }

        debug!(path = %self.path.display(), kept = kept.len(), total = history.len(), "History saved");
        Ok(())
    }
}
