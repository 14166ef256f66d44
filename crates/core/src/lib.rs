//! # AZCC Core
//!
//! Domain types, traits, and error definitions for the AZCC coding assistant.
//! Every other crate in the workspace depends inward on this one:
//!
//! - [`message`] — the `Turn` value object and its `Role`
//! - [`provider`] — the completion client contract (`Provider`)
//! - [`history`] — the persisted conversation log contract (`HistoryStore`)
//! - [`error`] — the error taxonomy shared by all crates

pub mod error;
pub mod history;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{ClientInitError, ContextError, HistoryError, ProviderError, RequestError};
pub use history::HistoryStore;
pub use message::{Role, Turn};
pub use provider::{ChunkReceiver, Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage};
