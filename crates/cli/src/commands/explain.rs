//! `azcc --explain FILE` — explain a source file in a fresh request.

use azcc_agent::context::EXPLAIN_MAX_CHARS;
use azcc_agent::{explain_prompt, ResponseMode, Session};
use std::path::Path;

pub async fn run(session: &Session, file: &Path, mode: ResponseMode) {
    let code = match std::fs::read_to_string(file) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: Failed to read {}: {e}", file.display());
            return;
        }
    };

    let (prompt, truncated) = explain_prompt(&code);
    if truncated {
        eprintln!(
            "File is very large, truncating to first {EXPLAIN_MAX_CHARS} characters for analysis."
        );
    }

    // Explanations are never recorded in history
    super::ask_and_print(session, &prompt, false, mode).await;
}
