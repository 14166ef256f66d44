//! In-memory history store — useful for testing and ephemeral sessions.

use azcc_core::error::HistoryError;
use azcc_core::history::retained_tail;
use azcc_core::message::Turn;
use azcc_core::HistoryStore;
use std::sync::{Arc, RwLock};

/// A history store that keeps the "persisted" turns in a Vec.
///
/// Applies the same `max_history` truncation as the file store. Clones
/// share the same storage, so a test can keep a handle and inspect what a
/// session saved.
#[derive(Clone)]
pub struct InMemoryHistoryStore {
    turns: Arc<RwLock<Vec<Turn>>>,
    max_history: usize,
}

impl InMemoryHistoryStore {
    pub fn new(max_history: usize) -> Self {
        Self::with_turns(Vec::new(), max_history)
    }

    /// Start with previously "persisted" turns.
    pub fn with_turns(turns: Vec<Turn>, max_history: usize) -> Self {
        Self {
            turns: Arc::new(RwLock::new(turns)),
            max_history,
        }
    }

    /// Snapshot of the currently stored turns.
    pub fn stored(&self) -> Vec<Turn> {
        self.turns.read().map(|t| t.clone()).unwrap_or_default()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn max_history(&self) -> usize {
        self.max_history
    }

    fn load(&self) -> Vec<Turn> {
        self.stored()
    }

    fn save(&self, history: &[Turn]) -> Result<(), HistoryError> {
        let mut turns = self.turns.write().map_err(|e| HistoryError::Save {
            path: "<memory>".into(),
            reason: e.to_string(),
        })?;
        *turns = retained_tail(history, self.max_history).to_vec();
        Ok(())
    }
}
