use anyhow::Result;

use kudos_history::HistoryLog;
use kudos_types::Role;

use crate::state::AppState;

pub async fn login(state: &AppState, username: &str, password: &str, role: Role) -> Result<()> {
    let session = state.sessions.login(username, password, role).await?;
    state.save_session(&session)?;

    let balance = state.ledger.balance(&session.username).await?;
    println!(
        "Logged in as {} ({:?}). Balance: {} ⭐",
        session.nickname, session.role, balance
    );
    Ok(())
}

pub fn logout(state: &AppState) -> Result<()> {
    state.clear_session()?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(state: &AppState) -> Result<()> {
    match state.current_session()? {
        Some(session) => println!(
            "{} ({:?}), logged in {}",
            session.nickname, session.role, session.logged_in_at
        ),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub async fn balance(state: &AppState, username: Option<&str>) -> Result<()> {
    let username = match username {
        Some(name) => name.to_string(),
        None => state.require_session()?.username,
    };
    let balance = state.ledger.balance(&username).await?;
    println!("{username}: {balance} ⭐");
    Ok(())
}

pub async fn history(state: &AppState, username: Option<&str>) -> Result<()> {
    let records = match username {
        Some(name) => state.history.query_by_counterpart(name).await?,
        None => state.history.all_records().await?,
    };

    if records.is_empty() {
        println!("No settled events.");
        return Ok(());
    }
    for record in records {
        let sign = if record.points >= 0 { "+" } else { "" };
        println!(
            "  {}  {:?}  {}{}  {}  (by {})",
            record.finished_at.format("%Y-%m-%d %H:%M"),
            record.category,
            sign,
            record.points,
            record.name,
            record.actor,
        );
    }
    Ok(())
}
