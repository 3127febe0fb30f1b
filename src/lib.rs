pub mod api;
pub mod board;
pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, DefaultsCommands, ShareCommands, WorkspaceCommands};
use cli::commands::*;
pub use config::Config;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let server = cli.server.as_deref();

    match cli.command {
        Some(Commands::Serve) => run_server(config).await,

        Some(Commands::Init) => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }

        Some(Commands::Signup { email, name }) => {
            cmd_signup(&config, server, &email, &name).await
        }

        Some(Commands::Login { email }) => cmd_login(&config, server, &email).await,

        Some(Commands::Logout) => cmd_logout(&config, server).await,

        Some(Commands::Whoami) => cmd_whoami(&config, server).await,

        Some(Commands::Board {
            project,
            status,
            offline,
        }) => cmd_board(&config, server, project.as_deref(), status, offline).await,

        Some(Commands::Add {
            title,
            category,
            project,
            service,
            author,
            description,
            priority,
            date,
            time,
            remind,
            calendar,
        }) => {
            cmd_add(
                &config,
                server,
                &title,
                category.into(),
                project,
                service,
                author,
                description,
                priority.into(),
                date,
                time,
                remind,
                calendar,
            )
            .await
        }

        Some(Commands::Move { id, status }) => cmd_move(&config, server, id, status).await,

        Some(Commands::Edit {
            id,
            title,
            author,
            description,
            priority,
            date,
            time,
        }) => {
            cmd_edit(
                &config,
                server,
                id,
                title,
                author,
                description,
                priority.map(Into::into),
                date,
                time,
            )
            .await
        }

        Some(Commands::Remove { id }) => cmd_remove(&config, server, id).await,

        Some(Commands::Workspace { command }) => match command {
            WorkspaceCommands::List { r#type } => {
                cmd_workspace_list(&config, server, r#type.map(Into::into)).await
            }
            WorkspaceCommands::Add { r#type, name } => {
                cmd_workspace_add(&config, server, r#type.into(), &name).await
            }
            WorkspaceCommands::Remove { r#type, name } => {
                cmd_workspace_remove(&config, server, r#type.into(), &name).await
            }
        },

        Some(Commands::Share { command }) => match command {
            ShareCommands::Create { title } => {
                cmd_share_create(&config, server, title.as_deref()).await
            }
            ShareCommands::Show { token } => cmd_share_show(&config, server, &token).await,
        },

        Some(Commands::Defaults { command }) => match command {
            DefaultsCommands::Show => cmd_defaults_show(&config, server).await,
            DefaultsCommands::Set {
                project,
                service,
                email,
                author,
            } => cmd_defaults_set(&config, server, project, service, email, author).await,
        },

        Some(Commands::Reminders) => cmd_reminders().await,

        None => {
            // Default to rendering the board, which also prints a login
            // hint when there is no session.
            cmd_board(&config, server, None, None, false).await
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    info!(
        "prboard v{} starting API server...",
        env!("CARGO_PKG_VERSION")
    );

    let host = config.server.host.clone();
    let port = config.server.port;

    let state = api::create_app_state_from_config(config).await?;
    let app = api::router(state).await;

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server_handle = tokio::spawn(async move {
        info!("API server running at http://{addr}");
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {e}");
        }
    });

    info!("Press Ctrl+C to stop.");
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {e}"),
    }

    server_handle.abort();
    info!("Server stopped");
    Ok(())
}
