mod commands;
mod config;
mod state;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use kudos_types::{Category, Role};

use crate::config::KudosConfig;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "kudos", about = "Shared family reward economy over a common room directory")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in on this device (executors register on first login)
    Login {
        username: String,
        password: String,
        #[arg(long, value_enum, default_value = "executor")]
        role: RoleArg,
    },
    /// Clear this device's session
    Logout,
    /// Show the current session
    Whoami,
    /// List enabled catalog entries
    Catalog {
        #[arg(value_enum)]
        category: Option<CategoryArg>,
    },
    /// Claim a task for approval
    Submit {
        #[arg(value_enum)]
        category: CategoryArg,
        task_id: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// List pending submissions
    Pending {
        /// Only the logged-in user's submissions
        #[arg(long)]
        mine: bool,
    },
    /// Approve a pending submission (admin)
    Approve { key: Uuid },
    /// Reject a pending submission (admin)
    Reject { key: Uuid },
    /// Credit a task that was never formally claimed (admin)
    QuickApprove {
        #[arg(value_enum)]
        category: CategoryArg,
        task_id: String,
        target: String,
    },
    /// Apply a penalty directly (admin)
    Penalty { penalty_id: String, target: String },
    /// Redeem a store item
    Buy { item_id: String },
    /// Show a balance
    Balance { username: Option<String> },
    /// Show the settled-event timeline
    History { username: Option<String> },
    /// Show or update the room/device directories
    Config {
        #[arg(long)]
        room_dir: Option<std::path::PathBuf>,
        #[arg(long)]
        device_dir: Option<std::path::PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Executor,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Executor => Role::Executor,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Core,
    Daily,
    Bounty,
    Penalty,
    Store,
}

impl From<CategoryArg> for Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Core => Category::Core,
            CategoryArg::Daily => Category::Daily,
            CategoryArg::Bounty => Category::Bounty,
            CategoryArg::Penalty => Category::Penalty,
            CategoryArg::Store => Category::Store,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let state_dir = KudosConfig::default_state_dir();
    let config = KudosConfig::load(&state_dir)?;
    let state = AppState::init(&config, &state_dir).await?;

    commands::dispatch(cli.command, &state, &state_dir).await
}
