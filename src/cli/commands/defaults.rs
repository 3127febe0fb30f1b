//! Form-defaults command handlers.

use super::session;
use crate::api::UpdateDefaultsRequest;
use crate::config::Config;

pub async fn cmd_defaults_show(config: &Config, server: Option<&str>) -> anyhow::Result<()> {
    let client = session::client(config, server).await;
    let doc = client.get_defaults().await?.defaults;

    println!("Form defaults");
    println!("{:-<40}", "");
    println!("  Project: {}", doc.default_project.as_deref().unwrap_or("-"));
    println!("  Service: {}", doc.default_service.as_deref().unwrap_or("-"));
    println!("  Author:  {}", doc.default_author.as_deref().unwrap_or("-"));
    println!("  Email:   {}", doc.default_email.as_deref().unwrap_or("-"));
    Ok(())
}

pub async fn cmd_defaults_set(
    config: &Config,
    server: Option<&str>,
    project: Option<String>,
    service: Option<String>,
    email: Option<String>,
    author: Option<String>,
) -> anyhow::Result<()> {
    if project.is_none() && service.is_none() && email.is_none() && author.is_none() {
        println!("Nothing to set. Use --project/--service/--email/--author.");
        return Ok(());
    }

    let client = session::client(config, server).await;
    let doc = client
        .update_defaults(&UpdateDefaultsRequest {
            default_project: project,
            default_service: service,
            default_email: email,
            default_author: author,
        })
        .await?
        .defaults;

    println!("✓ Defaults updated");
    println!("  Project: {}", doc.default_project.as_deref().unwrap_or("-"));
    println!("  Service: {}", doc.default_service.as_deref().unwrap_or("-"));
    println!("  Author:  {}", doc.default_author.as_deref().unwrap_or("-"));
    println!("  Email:   {}", doc.default_email.as_deref().unwrap_or("-"));
    Ok(())
}
