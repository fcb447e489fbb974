pub mod account;
pub mod config;
pub mod settle;
pub mod task;

use std::path::Path;

use anyhow::Result;

use crate::Commands;
use crate::state::AppState;

pub async fn dispatch(command: Commands, state: &AppState, state_dir: &Path) -> Result<()> {
    match command {
        Commands::Login {
            username,
            password,
            role,
        } => account::login(state, &username, &password, role.into()).await,
        Commands::Logout => account::logout(state),
        Commands::Whoami => account::whoami(state),
        Commands::Balance { username } => account::balance(state, username.as_deref()).await,
        Commands::History { username } => account::history(state, username.as_deref()).await,

        Commands::Catalog { category } => {
            task::catalog(state, category.map(Into::into)).await
        }
        Commands::Submit {
            category,
            task_id,
            note,
        } => task::submit(state, category.into(), &task_id, note).await,
        Commands::Pending { mine } => task::pending(state, mine).await,
        Commands::Approve { key } => task::approve(state, key).await,
        Commands::Reject { key } => task::reject(state, key).await,

        Commands::QuickApprove {
            category,
            task_id,
            target,
        } => settle::quick_approve(state, category.into(), &task_id, &target).await,
        Commands::Penalty { penalty_id, target } => {
            settle::penalty(state, &penalty_id, &target).await
        }
        Commands::Buy { item_id } => settle::buy(state, &item_id).await,

        Commands::Config {
            room_dir,
            device_dir,
        } => config::config(state_dir, room_dir, device_dir),
    }
}
