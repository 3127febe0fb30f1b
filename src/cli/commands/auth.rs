//! Account and session command handlers.

use anyhow::Context;

use super::session;
use crate::config::Config;

pub async fn cmd_signup(
    config: &Config,
    server: Option<&str>,
    email: &str,
    name: &str,
) -> anyhow::Result<()> {
    let password = session::prompt_password("Choose a password")?;

    let mut client = session::client(config, server).await;
    let user = client.signup(email, &password, name).await?;

    let token = client
        .token()
        .context("Server did not return a session cookie")?;
    session::save_token(token).await?;

    println!("✓ Account created: {} <{}>", user.name, user.email);
    println!("  Session stored; you are logged in.");
    Ok(())
}

pub async fn cmd_login(config: &Config, server: Option<&str>, email: &str) -> anyhow::Result<()> {
    let password = session::prompt_password("Password")?;

    let mut client = session::client(config, server).await;
    let user = client.login(email, &password).await?;

    let token = client
        .token()
        .context("Server did not return a session cookie")?;
    session::save_token(token).await?;

    println!("✓ Logged in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn cmd_logout(config: &Config, server: Option<&str>) -> anyhow::Result<()> {
    let mut client = session::client(config, server).await;

    // Best effort on the server side; the local session is dropped
    // either way.
    if client.token().is_some()
        && let Err(e) = client.logout().await
    {
        println!("Warning: server logout failed: {e}");
    }

    session::clear_token().await?;
    println!("✓ Logged out.");
    Ok(())
}

pub async fn cmd_whoami(config: &Config, server: Option<&str>) -> anyhow::Result<()> {
    let client = session::client(config, server).await;

    if client.token().is_none() {
        println!("Not logged in. Use: prboard login <email>");
        return Ok(());
    }

    let user = client.current_user().await?;

    println!("{} <{}>", user.name, user.email);
    println!(
        "  Theme: {} | Email notifications: {} | Calendar: {}",
        user.preferences.theme,
        user.preferences.email_notifications,
        user.preferences.calendar_integration
    );
    if let Some(last_login) = &user.last_login {
        println!("  Last login: {last_login}");
    }
    Ok(())
}
