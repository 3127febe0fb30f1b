//! Command-line interface for the PR board.
//!
//! Everything except `serve` and `init` talks to a running server through
//! the typed API client; the session token persists between invocations.

pub mod commands;

use clap::{Parser, Subcommand};

use crate::models::{Category, Priority, PrStatus};

/// Kanban-style pull request tracker
#[derive(Parser)]
#[command(name = "prboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server base URL (defaults to the configured public URL)
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create an account on the server
    Signup {
        email: String,
        /// Display name
        name: String,
    },

    /// Log in and store the session token
    Login { email: String },

    /// Drop the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show the board, grouped by column
    #[command(alias = "ls", alias = "list")]
    Board {
        /// Filter by project name
        #[arg(long)]
        project: Option<String>,

        /// Filter by status column
        #[arg(long)]
        status: Option<PrStatus>,

        /// Render the locally persisted snapshot without contacting the server
        #[arg(long)]
        offline: bool,
    },

    /// Add a PR card to the board
    #[command(alias = "a")]
    Add {
        title: String,

        #[arg(long, value_enum, default_value = "project")]
        category: CategoryArg,

        /// Project name (for project PRs)
        #[arg(long)]
        project: Option<String>,

        /// Service name (for service PRs)
        #[arg(long)]
        service: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_enum, default_value = "medium")]
        priority: PriorityArg,

        /// Scheduled review date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Scheduled review time (HH:MM)
        #[arg(long)]
        time: Option<String>,

        /// Opt into an email reminder at the scheduled time
        #[arg(long)]
        remind: bool,

        /// Generate a calendar event link for the scheduled time
        #[arg(long)]
        calendar: bool,
    },

    /// Move a card to another column
    #[command(alias = "mv")]
    Move { id: i32, status: PrStatus },

    /// Edit fields of an existing card
    Edit {
        id: i32,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        time: Option<String>,
    },

    /// Remove a card
    #[command(alias = "rm")]
    Remove { id: i32 },

    /// Manage project/service workspaces
    #[command(alias = "ws")]
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },

    /// Create or inspect read-only share links
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },

    /// Show or set the shared form defaults
    Defaults {
        #[command(subcommand)]
        command: DefaultsCommands,
    },

    /// List due scheduling reminders from the local snapshot
    Reminders,
}

#[derive(Subcommand)]
pub enum WorkspaceCommands {
    /// List workspaces
    #[command(alias = "ls")]
    List {
        #[arg(long, value_enum)]
        r#type: Option<CategoryArg>,
    },
    /// Add a workspace
    Add {
        #[arg(value_enum)]
        r#type: CategoryArg,
        name: String,
    },
    /// Remove a workspace (refused while PRs still reference it)
    #[command(alias = "rm")]
    Remove {
        #[arg(value_enum)]
        r#type: CategoryArg,
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ShareCommands {
    /// Mint a share link for your board
    Create {
        /// Custom link title
        #[arg(long)]
        title: Option<String>,
    },
    /// Resolve a share token and print the shared board
    Show { token: String },
}

#[derive(Subcommand)]
pub enum DefaultsCommands {
    /// Print the current defaults document
    Show,
    /// Merge new values into the defaults document
    Set {
        #[arg(long)]
        project: Option<String>,

        #[arg(long)]
        service: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        author: Option<String>,
    },
}

// clap's ValueEnum cannot be derived on the shared model enums without
// pulling clap into the model layer, so the CLI carries thin mirrors.

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CategoryArg {
    Project,
    Service,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Project => Self::Project,
            CategoryArg::Service => Self::Service,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
    Critical,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
            PriorityArg::Critical => Self::Critical,
        }
    }
}
