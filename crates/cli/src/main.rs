//! AZCC CLI — the main entry point.
//!
//! Modes (checked in this order):
//! - `-v/--version` — print the version, no initialization
//! - `--export FILE` — write the full history to FILE and exit
//! - `-c/--context PATH` — applied before any of the modes below
//! - `-i/--interactive` — read-eval loop
//! - `-e/--explain FILE` — explain a source file
//! - `PROMPT` — one-shot request

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod setup;

const VERSION_LINE: &str = "Azure Claude Code (AZCC) v0.1.0";

#[derive(Parser)]
#[command(
    name = "azcc",
    about = "Azure Claude Code - AI-powered coding assistant",
    disable_version_flag = true
)]
struct Cli {
    /// The prompt or command to send to the AI
    prompt: Option<String>,

    /// Start an interactive session
    #[arg(short, long)]
    interactive: bool,

    /// Explain the code in the specified file
    #[arg(short, long, value_name = "FILE")]
    explain: Option<PathBuf>,

    /// Set project context from a directory
    #[arg(short, long, value_name = "PATH")]
    context: Option<PathBuf>,

    /// Continue from previous conversation
    #[arg(long = "continue")]
    continue_conversation: bool,

    /// Export conversation history to a file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Disable streaming response
    #[arg(long)]
    no_stream: bool,

    /// Show version information
    #[arg(short = 'v', long)]
    version: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("{VERSION_LINE}");
        return ExitCode::SUCCESS;
    }

    // Initialize tracing; user-facing messages go through stdout/stderr directly
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run(cli));

    // An interrupted interactive session can leave the stdin reader blocked
    runtime.shutdown_background();
    code
}

async fn run(cli: Cli) -> ExitCode {
    let mut session = match setup::build_session() {
        Ok(session) => session,
        Err(e) => {
            setup::report(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(file) = &cli.export {
        commands::export::run(&session, file);
        return ExitCode::SUCCESS;
    }

    if let Some(path) = &cli.context {
        commands::report_context(path, session.set_context(path));
    }

    let mode = commands::response_mode(cli.no_stream);

    if cli.interactive {
        commands::interactive::run(&mut session, mode).await;
    } else if let Some(file) = &cli.explain {
        commands::explain::run(&session, file, mode).await;
    } else if let Some(prompt) = &cli.prompt {
        commands::ask::run(&mut session, prompt, cli.continue_conversation, mode).await;
    } else {
        eprintln!("No command specified. Try --help for usage information.");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
