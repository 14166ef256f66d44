//! End-to-end integration tests for AZCC.
//!
//! The first half drives a `Session` over a real file history store with a
//! scripted provider. The second half runs the `azcc` binary itself for the
//! paths that never reach the network.

use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};

use azcc_agent::{ContextUpdate, ResponseMode, Session};
use azcc_core::error::{ProviderError, RequestError};
use azcc_core::message::{Role, Turn};
use azcc_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use azcc_memory::FileHistoryStore;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted replies in sequence and keeps the
/// requests it was sent.
struct ScriptedProvider {
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    seen: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn text(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    fn requests(&self) -> Vec<ProviderRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.seen.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .expect("ScriptedProvider exhausted")?;
        Ok(ProviderResponse {
            message: Turn::assistant(reply),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}

fn session_with(provider: Arc<ScriptedProvider>, history_file: &Path, max: usize) -> Session {
    Session::new(
        provider,
        Box::new(FileHistoryStore::new(history_file, max)),
        "gpt-4",
        0.7,
    )
}

async fn ask(session: &Session, prompt: &str, continue_conversation: bool) -> Result<String, RequestError> {
    let mut printed = String::new();
    let mut sink = |f: &str| printed.push_str(f);
    let reply = session
        .ask(prompt, continue_conversation, ResponseMode::Stream, &mut sink)
        .await;
    if let Ok(text) = &reply {
        assert_eq!(&printed, text, "sink must see exactly the reply");
    }
    reply
}

// ── Session pipeline ─────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_continued_prompt_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("history.json");

    let provider = Arc::new(ScriptedProvider::text(&["first answer"]));
    let mut session = session_with(provider.clone(), &file, 10);
    let reply = ask(&session, "first question", true).await.unwrap();
    session.record_exchange("first question", reply);
    session.save_history().unwrap();

    // A fresh session sees the saved exchange and sends it back as history
    let provider = Arc::new(ScriptedProvider::text(&["second answer"]));
    let session = session_with(provider.clone(), &file, 10);
    assert_eq!(session.history().len(), 2);

    ask(&session, "second question", true).await.unwrap();
    let sent = &provider.requests()[0].messages;
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[0].role(), Role::System);
    assert_eq!(sent[1].content(), "first question");
    assert_eq!(sent[2].content(), "first answer");
    assert_eq!(sent[3].content(), "second question");
}

#[tokio::test]
async fn e2e_history_file_keeps_only_the_tail() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("history.json");

    let answers: Vec<String> = (0..4).map(|i| format!("a{i}")).collect();
    let refs: Vec<&str> = answers.iter().map(String::as_str).collect();
    let provider = Arc::new(ScriptedProvider::text(&refs));
    let mut session = session_with(provider, &file, 4);

    for i in 0..4 {
        let prompt = format!("q{i}");
        let reply = ask(&session, &prompt, true).await.unwrap();
        session.record_exchange(prompt, reply);
    }
    assert_eq!(session.history().len(), 8);
    session.save_history().unwrap();

    let stored: Vec<Turn> =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    let contents: Vec<&str> = stored.iter().map(|t| t.content()).collect();
    assert_eq!(contents, ["q2", "a2", "q3", "a3"]);
    assert!(!dir.path().join("history.json.tmp").exists());
}

#[tokio::test]
async fn e2e_context_reaches_fresh_requests_only() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("project");
    std::fs::create_dir(&project).unwrap();
    std::fs::write(project.join("main.rs"), "fn main() {}").unwrap();

    let provider = Arc::new(ScriptedProvider::text(&["fresh", "continued"]));
    let mut session = session_with(provider.clone(), &dir.path().join("h.json"), 10);

    match session.set_context(&project) {
        ContextUpdate::Set { files_used, .. } => assert_eq!(files_used, 1),
        other => panic!("unexpected context update: {other:?}"),
    }

    ask(&session, "what is this?", false).await.unwrap();
    ask(&session, "and now?", true).await.unwrap();

    let requests = provider.requests();
    let fresh_system = requests[0].messages[0].content();
    assert!(fresh_system.contains("Project context:"));
    assert!(fresh_system.contains("File: main.rs"));
    assert!(!requests[1].messages[0].content().contains("Project context:"));
}

#[tokio::test]
async fn e2e_missing_context_path_keeps_previous_context() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.py"), "print('hi')").unwrap();

    let provider = Arc::new(ScriptedProvider::text(&[]));
    let mut session = session_with(provider, &dir.path().join("h.json"), 10);

    assert!(matches!(session.set_context(dir.path()), ContextUpdate::Set { .. }));
    let update = session.set_context(&dir.path().join("nope"));
    assert!(matches!(update, ContextUpdate::PathMissing(_)));
    assert!(session.context().is_some_and(|c| c.contains("app.py")));
}

#[tokio::test]
async fn e2e_failed_request_is_not_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("h.json");

    let provider = Arc::new(ScriptedProvider::new(vec![Err(
        ProviderError::AuthenticationFailed("bad key".into()),
    )]));
    let session = session_with(provider, &file, 10);

    let err = ask(&session, "hello", true).await.unwrap_err();
    assert!(matches!(
        err,
        RequestError::Provider(ProviderError::AuthenticationFailed(_))
    ));
    assert!(session.history().is_empty());
    assert!(!file.exists());
}

#[tokio::test]
async fn e2e_export_writes_full_history() {
    let dir = tempfile::tempdir().unwrap();
    let provider = Arc::new(ScriptedProvider::text(&["a1", "a2"]));
    let mut session = session_with(provider, &dir.path().join("h.json"), 2);

    for prompt in ["q1", "q2"] {
        let reply = ask(&session, prompt, true).await.unwrap();
        session.record_exchange(prompt, reply);
    }

    // Export is not bounded by max_history
    let out = dir.path().join("export.json");
    session.export_history(&out).unwrap();
    let exported: Vec<Turn> =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(exported.len(), 4);
}

// ── Binary ───────────────────────────────────────────────────────────────

/// An `azcc` command isolated from the user's environment and config.
fn azcc(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_azcc"));
    cmd.env_clear()
        .current_dir(home)
        .env("HOME", home)
        .env("AZCC_CONFIG", home.join("missing-config.toml"))
        .env("AZCC_HISTORY_FILE", home.join("history.json"));
    cmd
}

fn with_credentials(cmd: &mut Command) -> &mut Command {
    cmd.env("AZURE_OPENAI_API_KEY", "test-key")
        .env("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com")
}

#[test]
fn e2e_version_needs_no_configuration() {
    let home = tempfile::tempdir().unwrap();
    let output = azcc(home.path()).arg("-v").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Azure Claude Code (AZCC) v0.1.0");
}

#[test]
fn e2e_missing_credentials_exit_with_guidance() {
    let home = tempfile::tempdir().unwrap();
    let output = azcc(home.path()).arg("hello").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("AZURE_OPENAI_API_KEY"));
}

#[test]
fn e2e_no_mode_exits_with_failure() {
    let home = tempfile::tempdir().unwrap();
    let output = with_credentials(&mut azcc(home.path())).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No command specified"));
}

#[test]
fn e2e_dotenv_supplies_credentials() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join(".env"),
        "AZURE_OPENAI_API_KEY=from-dotenv\nAZURE_OPENAI_ENDPOINT=https://dotenv.openai.azure.com\n",
    )
    .unwrap();

    // Credentials resolve, so startup gets as far as mode selection
    let output = azcc(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No command specified"), "stderr: {stderr}");
}

#[test]
fn e2e_environment_wins_over_dotenv() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join(".env"),
        "AZURE_OPENAI_API_KEY=from-dotenv\nAZURE_OPENAI_ENDPOINT=not a url\n",
    )
    .unwrap();

    // The malformed endpoint from .env would fail client construction
    let output = with_credentials(&mut azcc(home.path())).output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Invalid endpoint"), "stderr: {stderr}");
    assert!(stderr.contains("No command specified"), "stderr: {stderr}");
}

#[test]
fn e2e_export_with_empty_history() {
    let home = tempfile::tempdir().unwrap();
    let out = home.path().join("out.json");
    let output = with_credentials(&mut azcc(home.path()))
        .arg("--export")
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No history to export."));
    assert!(!out.exists());
}

#[test]
fn e2e_export_copies_saved_history() {
    let home = tempfile::tempdir().unwrap();
    let history = vec![Turn::user("q"), Turn::assistant("a")];
    std::fs::write(
        home.path().join("history.json"),
        serde_json::to_string(&history).unwrap(),
    )
    .unwrap();

    let out = home.path().join("out.json");
    let output = with_credentials(&mut azcc(home.path()))
        .arg("--export")
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success());
    let exported: Vec<Turn> =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[1].content(), "a");
}
