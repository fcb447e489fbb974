use anyhow::Result;
use uuid::Uuid;

use kudos_catalog::Catalog;
use kudos_channel::SubmissionChannel;
use kudos_types::Category;

use crate::state::AppState;

const ALL_CATEGORIES: [Category; 5] = [
    Category::Core,
    Category::Daily,
    Category::Bounty,
    Category::Penalty,
    Category::Store,
];

pub async fn catalog(state: &AppState, category: Option<Category>) -> Result<()> {
    let categories = match category {
        Some(c) => vec![c],
        None => ALL_CATEGORIES.to_vec(),
    };

    for category in categories {
        let defs = state.catalog.list_enabled(category).await?;
        if defs.is_empty() {
            continue;
        }
        println!("{category:?}:");
        for def in defs {
            println!("  {:<6} {} {}  ({} ⭐)", def.id, def.icon, def.name, def.points);
        }
    }
    Ok(())
}

pub async fn submit(
    state: &AppState,
    category: Category,
    task_id: &str,
    note: Option<String>,
) -> Result<()> {
    let session = state.require_session()?;
    let submitter = state.acting_user(&session).await?;

    let key = state.engine.submit(category, task_id, &submitter, note).await?;
    println!("Submitted for approval: {key}");
    Ok(())
}

pub async fn pending(state: &AppState, mine: bool) -> Result<()> {
    let submitter = if mine {
        Some(state.require_session()?.username)
    } else {
        None
    };

    let snapshot = state.channel.current_snapshot().await?;
    let pending = snapshot.pending(submitter.as_deref());
    if pending.is_empty() {
        println!("No pending submissions.");
        return Ok(());
    }
    for submission in pending {
        println!(
            "  {}  {}  +{}  by {}  at {}",
            submission.key,
            submission.name,
            submission.reward,
            submission.submitter_name,
            submission.created_at.format("%Y-%m-%d %H:%M"),
        );
        if let Some(note) = &submission.note {
            println!("      note: {note}");
        }
    }
    Ok(())
}

pub async fn approve(state: &AppState, key: Uuid) -> Result<()> {
    let session = state.require_admin()?;
    let approver = state.acting_user(&session).await?;

    let outcome = state.engine.approve(key, &approver).await?;
    println!(
        "Approved '{}': {} earns {} ⭐ (balance {})",
        outcome.task_name, outcome.submitter_name, outcome.reward, outcome.new_balance
    );
    Ok(())
}

pub async fn reject(state: &AppState, key: Uuid) -> Result<()> {
    state.require_admin()?;

    let outcome = state.engine.reject(key).await?;
    println!(
        "Rejected '{}' from {}. No points moved.",
        outcome.task_name, outcome.submitter_name
    );
    Ok(())
}
