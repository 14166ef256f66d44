//! Conversation history stores for AZCC.

pub mod file_history;
pub mod in_memory;

pub use file_history::FileHistoryStore;
pub use in_memory::InMemoryHistoryStore;
