//! Session and path plumbing shared by the CLI commands.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::client::ApiClient;
use crate::config::Config;

/// Per-user data directory for the session token and board snapshot.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".prboard"), |d| d.join("prboard"))
}

#[must_use]
pub fn session_path() -> PathBuf {
    data_dir().join("session.token")
}

#[must_use]
pub fn board_snapshot_path() -> PathBuf {
    data_dir().join("board.json")
}

pub async fn load_token() -> Option<String> {
    let raw = tokio::fs::read_to_string(session_path()).await.ok()?;
    let token = raw.trim().to_string();
    (!token.is_empty()).then_some(token)
}

pub async fn save_token(token: &str) -> Result<()> {
    let path = session_path();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, token)
        .await
        .with_context(|| format!("Failed to write session file: {}", path.display()))
}

pub async fn clear_token() -> Result<()> {
    match tokio::fs::remove_file(session_path()).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Base URL to talk to: the --server flag wins, then the configured
/// public URL.
#[must_use]
pub fn server_url(config: &Config, override_url: Option<&str>) -> String {
    override_url.map_or_else(|| config.server.public_url.clone(), str::to_string)
}

/// Build a client carrying the stored session, if any.
pub async fn client(config: &Config, override_url: Option<&str>) -> ApiClient {
    ApiClient::new(&server_url(config, override_url)).with_token(load_token().await)
}

/// Read a password from stdin. Plain line input; intended for
/// interactive terminals.
pub fn prompt_password(prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let password = input.trim_end_matches(['\n', '\r']).to_string();

    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    Ok(password)
}
