//! Request context: project file digests and conversation assembly.
//!
//! | Piece | Source | Included when |
//! |-------|--------|---------------|
//! | Persona | fixed instructions | always |
//! | Project context | [`ContextCollector`] digest | fresh requests only |
//! | History window | last 3 stored turns | continued requests only |
//! | Prompt | the user | always |

pub mod assembler;
pub mod collector;

pub use assembler::{
    explain_prompt, AssemblyInput, ConversationAssembler, EXPLAIN_MAX_CHARS, HISTORY_WINDOW,
    SYSTEM_PROMPT,
};
pub use collector::{CollectedContext, ContextCollector, MAX_FILES, MAX_FILE_CHARS, SOURCE_EXTENSIONS};
