//! `azcc --export FILE` — write the full history as indented JSON.

use azcc_agent::Session;
use std::path::Path;

pub fn run(session: &Session, file: &Path) {
    if session.history().is_empty() {
        println!("No history to export.");
        return;
    }

    match session.export_history(file) {
        Ok(()) => println!("History exported to {}", file.display()),
        Err(e) => eprintln!("Error: {e}"),
    }
}
