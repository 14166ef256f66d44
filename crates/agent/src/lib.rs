//! Request assembly and session state for AZCC.
//!
//! A request goes through three steps:
//!
//! 1. **Collect** (optional) — scan a directory into a project context digest
//! 2. **Assemble** — persona + context *or* recent history + the new prompt
//! 3. **Ask** — send it through the provider, streaming fragments to the caller
//!
//! [`Session`] ties these together with the loaded history and is passed
//! explicitly to every CLI mode.

pub mod context;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use context::{
    explain_prompt, AssemblyInput, CollectedContext, ContextCollector, ConversationAssembler,
};
pub use session::{ContextUpdate, FragmentSink, ResponseMode, Session};
