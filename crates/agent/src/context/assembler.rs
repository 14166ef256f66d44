//! Conversation assembly — the exact message sequence sent to the model.
//!
//! The assembled request is, in order:
//!
//! 1. **System** turn with the assistant persona, plus project context on
//!    fresh (non-continued) requests
//! 2. **History window** — the last [`HISTORY_WINDOW`] raw turns, only when
//!    continuing a conversation
//! 3. **User** turn with the new prompt
//!
//! Context and history are mutually exclusive: a continued conversation
//! relies on history and never re-sends context. No reordering or
//! deduplication happens beyond this.

use azcc_core::message::Turn;

/// Persona instructions that open every request.
pub const SYSTEM_PROMPT: &str = "You are AzureCC, a command-line AI assistant specialized in helping with code. \
Provide concise, practical responses focused on code solutions. \
Use markdown for formatting. For code, always specify the language. \
When explaining code, be clear and brief. ";

/// Number of history turns (not exchanges) included when continuing.
pub const HISTORY_WINDOW: usize = 3;

/// Maximum characters of a file sent for explanation.
pub const EXPLAIN_MAX_CHARS: usize = 4000;

const EXPLAIN_TRUNCATION_NOTICE: &str = "\n...\n(file truncated)";

/// All inputs required by the assembler for a single request.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    /// The new user prompt.
    pub prompt: &'a str,
    /// Whether this request continues the previous conversation.
    pub continue_conversation: bool,
    /// Project context, if one is set.
    pub context: Option<&'a str>,
    /// Conversation history, oldest first.
    pub history: &'a [Turn],
}

/// The conversation assembler. Stateless — create one and reuse it.
#[derive(Debug, Clone, Default)]
pub struct ConversationAssembler;

impl ConversationAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the request turns for `input`.
    pub fn build(&self, input: &AssemblyInput<'_>) -> Vec<Turn> {
        let mut system = String::from(SYSTEM_PROMPT);

        // An empty context is the same as no context.
        let context = input.context.filter(|c| !c.is_empty());
        if let (Some(context), false) = (context, input.continue_conversation) {
            system.push_str("\n\nProject context:\n");
            system.push_str(context);
        }

        let mut messages = Vec::with_capacity(HISTORY_WINDOW + 2);
        messages.push(Turn::system(system));

        if input.continue_conversation {
            let start = input.history.len().saturating_sub(HISTORY_WINDOW);
            messages.extend_from_slice(&input.history[start..]);
        }

        messages.push(Turn::user(input.prompt));
        messages
    }
}

/// Wrap source code in the explain-mode prompt.
///
/// Returns the prompt and whether the code had to be truncated.
pub fn explain_prompt(code: &str) -> (String, bool) {
    let truncated = code.chars().count() > EXPLAIN_MAX_CHARS;
    let body = if truncated {
        let head: String = code.chars().take(EXPLAIN_MAX_CHARS).collect();
        format!("{head}{EXPLAIN_TRUNCATION_NOTICE}")
    } else {
        code.to_string()
    };
    (format!("Explain this code concisely:\n```\n{body}\n```"), truncated)
}
