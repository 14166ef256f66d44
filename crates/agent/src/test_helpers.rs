//! Shared test helpers for session tests.

use azcc_core::error::ProviderError;
use azcc_core::message::Turn;
use azcc_core::provider::{ChunkReceiver, Provider, ProviderRequest, ProviderResponse, StreamChunk};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted provider reaction.
pub enum Script {
    /// A complete reply.
    Reply(String),
    /// Streamed fragments, optionally followed by a transport failure.
    Fragments { parts: Vec<String>, interrupt: bool },
    /// The request fails outright.
    Fail(ProviderError),
}

/// A mock provider that plays back scripted reactions in order and records
/// every request it receives.
///
/// Panics if more calls are made than reactions provided.
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replies(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Script::Reply(t.to_string())).collect())
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: ProviderRequest) -> Script {
        self.requests.lock().unwrap().push(request);
        self.scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedProvider: no more scripted reactions")
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        let text = match self.next(request) {
            Script::Reply(text) => text,
            Script::Fragments { parts, .. } => parts.concat(),
            Script::Fail(e) => return Err(e),
        };
        Ok(ProviderResponse {
            message: Turn::assistant(text),
            usage: None,
            model,
        })
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ChunkReceiver, ProviderError> {
        let (parts, interrupt) = match self.next(request) {
            Script::Reply(text) => (vec![text], false),
            Script::Fragments { parts, interrupt } => (parts, interrupt),
            Script::Fail(e) => return Err(e),
        };

        let (tx, rx) = tokio::sync::mpsc::channel(parts.len() + 1);
        for part in parts {
            let _ = tx.try_send(Ok(StreamChunk::fragment(part)));
        }
        let last = if interrupt {
            Err(ProviderError::StreamInterrupted("connection reset".into()))
        } else {
            Ok(StreamChunk::finished(None))
        };
        let _ = tx.try_send(last);
        Ok(rx)
    }
}
