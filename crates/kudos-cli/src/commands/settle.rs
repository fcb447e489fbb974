use anyhow::Result;

use kudos_types::Category;

use crate::state::AppState;

pub async fn quick_approve(
    state: &AppState,
    category: Category,
    task_id: &str,
    target: &str,
) -> Result<()> {
    let session = state.require_admin()?;
    let actor = state.acting_user(&session).await?;

    let outcome = state
        .engine
        .quick_approve(category, task_id, target, &actor)
        .await?;
    println!(
        "Credited '{}' to {}: +{} ⭐ (balance {})",
        outcome.task_name, target, outcome.reward, outcome.new_balance
    );
    Ok(())
}

pub async fn penalty(state: &AppState, penalty_id: &str, target: &str) -> Result<()> {
    let session = state.require_admin()?;
    let actor = state.acting_user(&session).await?;

    let outcome = state.engine.apply_penalty(penalty_id, target, &actor).await?;
    println!(
        "Applied '{}' to {}: -{} ⭐ (balance {})",
        outcome.penalty_name, target, outcome.cost, outcome.new_balance
    );
    Ok(())
}

pub async fn buy(state: &AppState, item_id: &str) -> Result<()> {
    let session = state.require_session()?;
    let buyer = state.acting_user(&session).await?;

    let outcome = state.engine.buy_item(item_id, &buyer).await?;
    println!(
        "Redeemed '{}' for {} ⭐ (balance {})",
        outcome.item_name, outcome.cost, outcome.new_balance
    );
    Ok(())
}
