//! Share-link command handlers.

use super::session;
use crate::config::Config;
use crate::models::PrStatus;

pub async fn cmd_share_create(
    config: &Config,
    server: Option<&str>,
    title: Option<&str>,
) -> anyhow::Result<()> {
    let client = session::client(config, server).await;
    let share = client.create_share(title).await?;

    println!("✓ Share link created");
    println!("  URL: {}", share.share_url);
    println!("  Expires: {}", share.expires_at);
    println!();
    println!("Anyone with this URL can view your board until it expires.");
    Ok(())
}

pub async fn cmd_share_show(
    config: &Config,
    server: Option<&str>,
    token: &str,
) -> anyhow::Result<()> {
    let client = session::client(config, server).await;
    let view = client.resolve_share(token).await?;

    println!("{} (shared by {})", view.title, view.created_by);
    println!("Created: {} | Views: {}", view.created_at, view.access_count);
    println!("{:-<60}", "");

    for status in PrStatus::ALL {
        let cards: Vec<_> = view.prs.iter().filter(|pr| pr.status == status).collect();
        if cards.is_empty() {
            continue;
        }
        println!();
        println!("{} ({})", status.title(), cards.len());
        for pr in cards {
            println!("  [#{}] {} - {}", pr.id, pr.title, pr.author);
        }
    }
    Ok(())
}
