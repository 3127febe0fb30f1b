//! Workspace command handlers.

use super::session;
use crate::config::Config;
use crate::models::Category;

pub async fn cmd_workspace_list(
    config: &Config,
    server: Option<&str>,
    ws_type: Option<Category>,
) -> anyhow::Result<()> {
    let client = session::client(config, server).await;
    let listing = client.list_workspaces(ws_type).await?;

    if listing.items.is_empty() {
        println!("No workspaces yet.");
        println!("Add one with: prboard workspace add project <name>");
        return Ok(());
    }

    println!("Workspaces ({} total)", listing.items.len());
    println!("{:-<60}", "");
    for ws in listing.items {
        println!("  {:<8} {}", ws.ws_type.to_string(), ws.name);
    }
    Ok(())
}

pub async fn cmd_workspace_add(
    config: &Config,
    server: Option<&str>,
    ws_type: Category,
    name: &str,
) -> anyhow::Result<()> {
    let client = session::client(config, server).await;

    match client.create_workspace(ws_type, name).await {
        Ok(created) => println!("✓ Added {} workspace: {}", ws_type, created.item.name),
        Err(e) => println!("✗ {e}"),
    }
    Ok(())
}

pub async fn cmd_workspace_remove(
    config: &Config,
    server: Option<&str>,
    ws_type: Category,
    name: &str,
) -> anyhow::Result<()> {
    let client = session::client(config, server).await;

    match client.delete_workspace(ws_type, name).await {
        Ok(()) => println!("✓ Removed {ws_type} workspace: {name}"),
        Err(e) => println!("✗ {e}"),
    }
    Ok(())
}
