//! CLI modes and the console output they share.

pub mod ask;
pub mod explain;
pub mod export;
pub mod interactive;

use azcc_agent::{ContextUpdate, FragmentSink, ResponseMode, Session};
use azcc_core::error::{ProviderError, RequestError};
use std::io::Write;
use std::path::Path;

/// Writes reply fragments to `out` as they arrive.
struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> FragmentSink for ConsoleSink<W> {
    fn on_fragment(&mut self, fragment: &str) {
        let _ = write!(self.out, "{fragment}");
        let _ = self.out.flush();
    }

    fn on_interrupted(&mut self, error: &ProviderError) {
        let _ = write!(self.out, "\n\n[response interrupted: {error}]");
        let _ = self.out.flush();
    }
}

pub fn response_mode(no_stream: bool) -> ResponseMode {
    if no_stream {
        ResponseMode::Blocking
    } else {
        ResponseMode::Stream
    }
}

/// Issue one request, printing the reply as it arrives.
///
/// Errors are reported here; `None` means there is no reply to record.
pub async fn ask_and_print(
    session: &Session,
    prompt: &str,
    continue_conversation: bool,
    mode: ResponseMode,
) -> Option<String> {
    let mut sink = ConsoleSink {
        out: std::io::stdout(),
    };

    let result = session
        .ask(prompt, continue_conversation, mode, &mut sink)
        .await;

    match result {
        Ok(reply) => {
            println!("\n");
            Some(reply)
        }
        Err(e) => {
            report_request_error(&e);
            None
        }
    }
}

pub fn report_request_error(err: &RequestError) {
    eprintln!("\nError: {err}");
}

pub fn report_context(path: &Path, update: ContextUpdate) {
    match update {
        ContextUpdate::Set {
            files_used,
            files_found,
        } => {
            print!("Context set with {files_used} files from {}", path.display());
            if files_found > files_used {
                print!(" ({files_found} eligible files found)");
            }
            println!();
        }
        ContextUpdate::PathMissing(missing) => {
            eprintln!("Warning: Context path '{}' does not exist.", missing.display());
        }
        ContextUpdate::NoFiles => {
            eprintln!("No code files found in the specified path.");
        }
    }
}
