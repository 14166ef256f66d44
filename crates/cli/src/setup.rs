//! Startup: configuration, client and history, in that order.
//!
//! Failures here are the only fatal ones; everything after startup is
//! reported and recovered at the point of use.

use azcc_agent::Session;
use azcc_config::{AppConfig, ConfigError, ENV_API_KEY, ENV_ENDPOINT};
use azcc_core::error::ClientInitError;
use azcc_memory::FileHistoryStore;
use azcc_providers::AzureOpenAiProvider;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialize Azure OpenAI client: {0}")]
    ClientInit(#[from] ClientInitError),
}

/// Resolve configuration and build the session.
///
/// A `.env` file in the working directory (or a parent) is loaded first;
/// variables already set in the environment take precedence over it.
pub fn build_session() -> Result<Session, StartupError> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }
    let config = AppConfig::load()?;
    let provider = AzureOpenAiProvider::from_config(&config)?;
    let store = FileHistoryStore::new(&config.history_file, config.max_history);

    tracing::debug!(
        deployment = %config.deployment,
        history_file = %config.history_file.display(),
        "Startup complete"
    );

    Ok(Session::new(
        Arc::new(provider),
        Box::new(store),
        &config.deployment,
        config.temperature,
    ))
}

/// Print a startup failure with setup guidance.
pub fn report(err: &StartupError) {
    eprintln!("Error: {err}");
    if let StartupError::Config(ConfigError::MissingCredentials(_)) = err {
        eprintln!();
        eprintln!("  Set these environment variables (or put them in a .env file):");
        eprintln!("    {ENV_API_KEY}  = '<your key>'");
        eprintln!("    {ENV_ENDPOINT} = 'https://<resource>.openai.azure.com'");
        eprintln!();
        eprintln!("  Or add `api_key` and `endpoint` to your config file:");
        eprintln!("    {}", AppConfig::default_config_path().display());
    }
}
