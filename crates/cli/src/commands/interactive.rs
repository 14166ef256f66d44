//! `azcc --interactive` — read-eval loop.
//!
//! Each line is either a loop command (`exit`, `quit`, `q`,
//! `context <path>`) or a prompt sent as a continued conversation.
//! Successful exchanges are recorded as they happen and saved once when the
//! loop ends, including when it ends through Ctrl+C.

use azcc_agent::{ResponseMode, Session};
use std::io::Write;
use std::path::Path;
use tokio::io::{self, AsyncBufReadExt, BufReader};

/// A parsed line of interactive input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Exit,
    Context(&'a str),
    Prompt(&'a str),
    Empty,
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if ["exit", "quit", "q"].iter().any(|c| line.eq_ignore_ascii_case(c)) {
        return Command::Exit;
    }
    match line.get(..8) {
        Some(prefix) if prefix.eq_ignore_ascii_case("context ") => Command::Context(line[8..].trim()),
        _ => Command::Prompt(line),
    }
}

pub async fn run(session: &mut Session, mode: ResponseMode) {
    println!("Starting interactive AzureCC session. Type 'exit' or 'quit' to end.");
    println!("Type 'context <path>' to set project context.");

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut exchanges = 0usize;

    loop {
        print!("\n[azcc]> ");
        let _ = std::io::stdout().flush();

        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                eprintln!("Session terminated by user.");
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break, // EOF (Ctrl+D)
            Err(e) => {
                eprintln!("Error: failed to read input: {e}");
                break;
            }
        };

        match parse_command(&line) {
            Command::Empty => continue,
            Command::Exit => break,
            Command::Context(path) => {
                let path = Path::new(path);
                super::report_context(path, session.set_context(path));
            }
            Command::Prompt(prompt) => {
                let reply = tokio::select! {
                    reply = super::ask_and_print(session, prompt, true, mode) => reply,
                    _ = tokio::signal::ctrl_c() => {
                        println!();
                        eprintln!("Session terminated by user.");
                        break;
                    }
                };
                if let Some(reply) = reply {
                    session.record_exchange(prompt, reply);
                    exchanges += 1;
                }
            }
        }
    }

    if exchanges > 0 {
        match session.save_history() {
            Ok(()) => println!("Session history saved with {exchanges} exchanges."),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}
