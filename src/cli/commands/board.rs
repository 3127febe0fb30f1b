//! Board command handlers: render, add, move, edit, remove, reminders.

use chrono::Utc;

use super::session;
use crate::api::{CreatePrRequest, UpdatePrRequest};
use crate::board::{BoardState, Outcome, Reconciler, advisory};
use crate::config::Config;
use crate::models::{Category, PrItem, PrStatus, Priority};

async fn reconciler(config: &Config, server: Option<&str>) -> anyhow::Result<Reconciler> {
    let client = session::client(config, server).await;
    Reconciler::load(client, session::board_snapshot_path()).await
}

pub async fn cmd_board(
    config: &Config,
    server: Option<&str>,
    project: Option<&str>,
    status: Option<PrStatus>,
    offline: bool,
) -> anyhow::Result<()> {
    if offline {
        let board = BoardState::load(&session::board_snapshot_path()).await?;
        println!("(offline snapshot)");
        render_board(&board, project, status);
        return Ok(());
    }

    let mut reconciler = reconciler(config, server).await?;
    reconciler.refresh().await?;
    render_board(reconciler.board(), project, status);
    Ok(())
}

fn render_board(board: &BoardState, project: Option<&str>, status: Option<PrStatus>) {
    let mut total = 0;

    for (column, cards) in board.columns() {
        if status.is_some_and(|s| s != column) {
            continue;
        }

        let cards: Vec<&PrItem> = cards
            .into_iter()
            .filter(|pr| project.is_none_or(|p| pr.project.as_deref() == Some(p)))
            .collect();

        println!();
        println!("{} ({})", column.title(), cards.len());
        println!("{:-<60}", "");

        for pr in cards {
            total += 1;
            let workspace = pr.workspace_name().unwrap_or("-");
            println!(
                "  [#{}] {} ({} {})",
                pr.id,
                pr.title,
                pr.priority,
                priority_marker(pr.priority)
            );
            println!("      {}: {} | by {}", pr.category, workspace, pr.author);

            if let Some(date) = &pr.scheduled_date {
                let time = pr.scheduled_time.as_deref().unwrap_or("");
                println!("      Scheduled: {date} {time}");
            }
        }
    }

    let unsynced = board.unsynced().len();
    println!();
    println!("{total} card(s) shown");
    if unsynced > 0 {
        println!("⚠ {unsynced} card(s) saved locally only, not confirmed by the server");
    }
}

const fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "·",
        Priority::Medium => "•",
        Priority::High => "▲",
        Priority::Critical => "‼",
    }
}

#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
pub async fn cmd_add(
    config: &Config,
    server: Option<&str>,
    title: &str,
    category: Category,
    project: Option<String>,
    service: Option<String>,
    author: Option<String>,
    description: Option<String>,
    priority: Priority,
    date: Option<String>,
    time: Option<String>,
    remind: bool,
    calendar: bool,
) -> anyhow::Result<()> {
    let client = session::client(config, server).await;

    // Fill gaps from the shared defaults document, like the web form does.
    let defaults = client
        .get_defaults()
        .await
        .map(|r| r.defaults)
        .unwrap_or_default();

    let author = author
        .or(defaults.default_author)
        .unwrap_or_else(|| "Unknown".to_string());
    let project = project.or_else(|| {
        matches!(category, Category::Project)
            .then_some(defaults.default_project)
            .flatten()
    });
    let service = service.or_else(|| {
        matches!(category, Category::Service)
            .then_some(defaults.default_service)
            .flatten()
    });

    let request = CreatePrRequest {
        title: title.to_string(),
        category,
        project: project.clone(),
        service: service.clone(),
        author: author.clone(),
        description: description.clone(),
        priority,
        links: vec![],
        scheduled_date: date.clone(),
        scheduled_time: time.clone(),
        email_reminder: remind,
        calendar_event: calendar,
    };

    let now = Utc::now().to_rfc3339();
    let local = PrItem {
        id: 0,
        title: title.to_string(),
        category,
        project,
        service,
        author,
        description,
        status: PrStatus::Initial,
        priority,
        links: vec![],
        scheduled_date: date,
        scheduled_time: time,
        email_reminder: remind,
        calendar_event: calendar,
        created_at: now.clone(),
        updated_at: now,
    };

    let mut reconciler = Reconciler::load(client, session::board_snapshot_path()).await?;
    match reconciler.create_pr(local, request).await? {
        Outcome::Synced(pr) => println!("✓ Added: {} (#{})", pr.title, pr.id),
        Outcome::LocalOnly(pr) => {
            println!("⚠ Server rejected the create; card kept locally only: {}", pr.title);
        }
    }
    Ok(())
}

pub async fn cmd_move(
    config: &Config,
    server: Option<&str>,
    id: i32,
    status: PrStatus,
) -> anyhow::Result<()> {
    let mut reconciler = reconciler(config, server).await?;
    reconciler.refresh().await?;

    match reconciler.move_pr(id, status).await {
        Ok(pr) => println!("✓ #{} moved to {}", pr.id, pr.status.title()),
        Err(e) => println!("✗ Move rejected, card reverted: {e}"),
    }
    Ok(())
}

pub async fn cmd_edit(
    config: &Config,
    server: Option<&str>,
    id: i32,
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    date: Option<String>,
    time: Option<String>,
) -> anyhow::Result<()> {
    let mut reconciler = reconciler(config, server).await?;
    reconciler.refresh().await?;

    let Some(entry) = reconciler.board().get(id) else {
        println!("No PR with id {id}. Use 'prboard board' to list cards.");
        return Ok(());
    };

    let mut edited = entry.pr.clone();
    if let Some(title) = &title {
        edited.title.clone_from(title);
    }
    if let Some(author) = &author {
        edited.author.clone_from(author);
    }
    if let Some(description) = &description {
        edited.description = Some(description.clone());
    }
    if let Some(priority) = priority {
        edited.priority = priority;
    }
    if let Some(date) = &date {
        edited.scheduled_date = Some(date.clone());
    }
    if let Some(time) = &time {
        edited.scheduled_time = Some(time.clone());
    }

    let request = UpdatePrRequest {
        id,
        title,
        author,
        description,
        priority,
        scheduled_date: date,
        scheduled_time: time,
        ..Default::default()
    };

    match reconciler.edit_pr(edited, request).await? {
        Outcome::Synced(pr) => println!("✓ Updated #{}: {}", pr.id, pr.title),
        Outcome::LocalOnly(pr) => {
            println!("⚠ Edit saved locally only, server did not confirm: {}", pr.title);
        }
    }
    Ok(())
}

pub async fn cmd_remove(config: &Config, server: Option<&str>, id: i32) -> anyhow::Result<()> {
    let mut reconciler = reconciler(config, server).await?;
    reconciler.delete_pr(id).await?;
    println!("✓ Removed #{id}");
    Ok(())
}

/// Best-effort reminder scan over the locally persisted snapshot.
pub async fn cmd_reminders() -> anyhow::Result<()> {
    let board = BoardState::load(&session::board_snapshot_path()).await?;
    let prs: Vec<PrItem> = board.entries.iter().map(|e| e.pr.clone()).collect();

    let due = advisory::due_reminders(&prs, Utc::now());

    if due.is_empty() {
        println!("No reminders due.");
        return Ok(());
    }

    println!("Due reminders ({})", due.len());
    println!("{:-<60}", "");
    for reminder in due {
        println!(
            "  [#{}] {} - scheduled {}",
            reminder.pr_id, reminder.title, reminder.scheduled_for
        );
        if let Some(url) = reminder.calendar_url {
            println!("      Calendar: {url}");
        }
    }
    Ok(())
}
