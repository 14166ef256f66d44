//! HistoryStore trait — the persisted, bounded log of past turns.
//!
//! History is loaded once at startup and saved once when a session or
//! command ends. There is a single writer (the running process), so the
//! trait is synchronous and takes `&self`.

use crate::error::HistoryError;
use crate::message::Turn;
use std::path::Path;

/// Persistence contract for conversation history.
pub trait HistoryStore: Send + Sync {
    /// A short name for logs (e.g. "file", "in_memory").
    fn name(&self) -> &str;

    /// Maximum number of turns kept by `save()`.
    fn max_history(&self) -> usize;

    /// Load persisted history.
    ///
    /// Missing, unreadable or corrupt state yields an empty history; it is
    /// never an error.
    fn load(&self) -> Vec<Turn>;

    /// Persist the last `max_history()` turns, replacing what was stored.
    fn save(&self, history: &[Turn]) -> Result<(), HistoryError>;

    /// Write the full history (not the truncated persisted form) to
    /// `destination` as indented JSON.
    fn export(&self, history: &[Turn], destination: &Path) -> Result<(), HistoryError> {
        export_turns(history, destination)
    }
}

/// The most recent `max` turns of `history`, in chronological order.
pub fn retained_tail(history: &[Turn], max: usize) -> &[Turn] {
    &history[history.len().saturating_sub(max)..]
}

/// Serialize `history` as a pretty-printed JSON array at `destination`.
pub fn export_turns(history: &[Turn], destination: &Path) -> Result<(), HistoryError> {
    let export_err = |reason: String| HistoryError::Export {
        path: destination.to_path_buf(),
        reason,
    };

    let json = serde_json::to_string_pretty(history).map_err(|e| export_err(e.to_string()))?;
    std::fs::write(destination, json).map_err(|e| export_err(e.to_string()))?;

    tracing::debug!(path = %destination.display(), turns = history.len(), "History exported");
    Ok(())
}

/// Parse a JSON array of turns, as written by `export_turns`.
pub fn parse_turns(json: &str) -> Result<Vec<Turn>, serde_json::Error> {
    serde_json::from_str(json)
}
