//! Session state: configuration-derived settings, history and context.
//!
//! A [`Session`] is built once at startup and passed explicitly to every
//! operation. It owns the in-memory history (loaded from the store when the
//! session is created) and the current project context, and it is the only
//! place a request is issued from.

use crate::context::{AssemblyInput, ContextCollector, ConversationAssembler};
use azcc_core::error::{ContextError, HistoryError, ProviderError, RequestError};
use azcc_core::message::Turn;
use azcc_core::provider::{Provider, ProviderRequest};
use azcc_core::HistoryStore;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

/// How a reply is requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Fragments are forwarded as they arrive.
    Stream,
    /// The whole reply arrives at once.
    Blocking,
}

/// Receives reply text as it becomes available.
pub trait FragmentSink {
    fn on_fragment(&mut self, fragment: &str);

    /// Called when a stream breaks after some text was received; the text
    /// forwarded so far becomes the reply.
    fn on_interrupted(&mut self, _error: &ProviderError) {}
}

impl<F: FnMut(&str)> FragmentSink for F {
    fn on_fragment(&mut self, fragment: &str) {
        self(fragment)
    }
}

/// Outcome of [`Session::set_context`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextUpdate {
    /// A new context replaced the previous one.
    Set { files_used: usize, files_found: usize },
    /// The path does not exist; the previous context is unchanged.
    PathMissing(PathBuf),
    /// No readable source file was found; the context is now unset.
    NoFiles,
}

/// The running assistant's state.
pub struct Session {
    provider: Arc<dyn Provider>,
    store: Box<dyn HistoryStore>,
    deployment: String,
    temperature: f32,
    history: Vec<Turn>,
    context: Option<String>,
    collector: ContextCollector,
    assembler: ConversationAssembler,
}

impl Session {
    /// Create a session, loading persisted history from `store`.
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Box<dyn HistoryStore>,
        deployment: impl Into<String>,
        temperature: f32,
    ) -> Self {
        let history = store.load();
        debug!(store = store.name(), turns = history.len(), "Session started");
        Self {
            provider,
            store,
            deployment: deployment.into(),
            temperature,
            history,
            context: None,
            collector: ContextCollector::new(),
            assembler: ConversationAssembler::new(),
        }
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Replace the project context with a digest of `path`.
    pub fn set_context(&mut self, path: &Path) -> ContextUpdate {
        match self.collector.collect(path) {
            Ok(collected) => match collected.text {
                Some(text) => {
                    self.context = Some(text);
                    info!(path = %path.display(), files = collected.files_used.len(), "Context set");
                    ContextUpdate::Set {
                        files_used: collected.files_used.len(),
                        files_found: collected.files_found,
                    }
                }
                None => {
                    self.context = None;
                    warn!(path = %path.display(), "No code files found for context");
                    ContextUpdate::NoFiles
                }
            },
            Err(ContextError::PathNotFound(missing)) => {
                warn!(path = %missing.display(), "Context path does not exist");
                ContextUpdate::PathMissing(missing)
            }
            Err(e) => {
                warn!(error = %e, "Context collection failed");
                self.context = None;
                ContextUpdate::NoFiles
            }
        }
    }

    /// The exact turns that `ask` would send for this prompt.
    pub fn build_messages(&self, prompt: &str, continue_conversation: bool) -> Vec<Turn> {
        self.assembler.build(&AssemblyInput {
            prompt,
            continue_conversation,
            context: self.context.as_deref(),
            history: &self.history,
        })
    }

    /// Send `prompt` to the model and return the reply of record.
    ///
    /// Reply text is passed to `sink` as it arrives (in blocking mode, once).
    /// If a stream breaks after some text was received, that partial text is
    /// the reply. Nothing is recorded in history here; see
    /// [`Session::record_exchange`].
    pub async fn ask(
        &self,
        prompt: &str,
        continue_conversation: bool,
        mode: ResponseMode,
        sink: &mut dyn FragmentSink,
    ) -> Result<String, RequestError> {
        let request = ProviderRequest {
            model: self.deployment.clone(),
            messages: self.build_messages(prompt, continue_conversation),
            temperature: self.temperature,
            stream: mode == ResponseMode::Stream,
        };

        debug!(
            provider = self.provider.name(),
            turns = request.messages.len(),
            continue_conversation,
            ?mode,
            "Issuing request"
        );

        let reply = match mode {
            ResponseMode::Blocking => {
                let response = self.provider.complete(request).await?;
                debug!(model = %response.model, usage = ?response.usage, "Completion received");
                let text = response.message.content().to_string();
                if !text.is_empty() {
                    sink.on_fragment(&text);
                }
                text
            }
            ResponseMode::Stream => self.consume_stream(request, sink).await?,
        };

        if reply.is_empty() {
            return Err(RequestError::EmptyResponse);
        }
        Ok(reply)
    }

    async fn consume_stream(
        &self,
        request: ProviderRequest,
        sink: &mut dyn FragmentSink,
    ) -> Result<String, RequestError> {
        let mut stream = ReceiverStream::new(self.provider.stream(request).await?);
        let mut reply = String::new();

        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) => {
                    if let Some(text) = chunk.content.filter(|c| !c.is_empty()) {
                        sink.on_fragment(&text);
                        reply.push_str(&text);
                    }
                    if chunk.done {
                        if let Some(usage) = chunk.usage {
                            debug!(?usage, "Stream finished");
                        }
                        break;
                    }
                }
                Err(e) if reply.is_empty() => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, received = reply.len(), "Stream interrupted, keeping partial reply");
                    sink.on_interrupted(&e);
                    break;
                }
            }
        }

        Ok(reply)
    }

    /// Append a completed user/assistant exchange to the in-memory history.
    pub fn record_exchange(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.history.push(Turn::user(prompt));
        self.history.push(Turn::assistant(reply));
    }

    /// Persist the history through the store (which keeps only the tail).
    pub fn save_history(&self) -> Result<(), HistoryError> {
        self.store.save(&self.history)
    }

    /// Write the full in-memory history to `destination`.
    pub fn export_history(&self, destination: &Path) -> Result<(), HistoryError> {
        self.store.export(&self.history, destination)
    }
}
