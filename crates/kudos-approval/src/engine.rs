use std::sync::Arc;

use uuid::Uuid;

use kudos_catalog::Catalog;
use kudos_channel::SubmissionChannel;
use kudos_history::{HistoryLog, HistoryRecord};
use kudos_ledger::Ledger;
use kudos_types::{
    Category, KudosError, NewSubmission, Result, SubmissionEvent, TaskDefinition, User,
};

use crate::outcome::{ApproveOutcome, PenaltyOutcome, PurchaseOutcome, RejectOutcome};

/// Executes the submission lifecycle: claims become pending records on the
/// shared channel, approvals and rejections settle them, penalties and
/// purchases settle directly.
///
/// Collaborators are injected behind traits, so tests can run against
/// deterministic snapshots and stores without a live transport. Every
/// operation completes fully or fails with one typed error; there is no
/// retry here.
pub struct ApprovalEngine {
    catalog: Arc<dyn Catalog>,
    channel: Arc<dyn SubmissionChannel>,
    ledger: Ledger,
    history: Arc<dyn HistoryLog>,
}

impl ApprovalEngine {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        channel: Arc<dyn SubmissionChannel>,
        ledger: Ledger,
        history: Arc<dyn HistoryLog>,
    ) -> Self {
        Self {
            catalog,
            channel,
            ledger,
            history,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Claim a task. Publishes a pending submission; no points move until an
    /// approver settles it.
    ///
    /// The duplicate check runs against the current snapshot, which is
    /// eventually consistent — two devices racing past it can still publish
    /// twice, and the loser surfaces at approval time instead.
    pub async fn submit(
        &self,
        category: Category,
        task_id: &str,
        submitter: &User,
        note: Option<String>,
    ) -> Result<Uuid> {
        if !category.is_claimable() {
            return Err(KudosError::Validation(format!(
                "{category:?} entries are settled directly, not claimed"
            )));
        }
        let def = self.resolve(category, task_id).await?;

        let snapshot = self.channel.current_snapshot().await?;
        if snapshot.has_pending(&def.id, &submitter.username) {
            return Err(KudosError::AlreadySubmitted(def.name));
        }

        let key = self
            .channel
            .publish(NewSubmission::claim(&def, submitter, note))
            .await?;
        tracing::info!(task_id, submitter = %submitter.username, %key, "submission published");
        Ok(key)
    }

    /// Approve a pending submission: claim it off the channel, record the
    /// settled event, credit the submitter, push the balance remote.
    ///
    /// The claim is the atomic `take` — exactly one of any number of racing
    /// approvers gets the submission; the rest fail `SubmissionNotFound`
    /// ("already processed"), so calling approve twice with the same key
    /// never double-credits. A history append failure after a successful
    /// claim is logged rather than masking the credit.
    pub async fn approve(&self, key: Uuid, approver: &User) -> Result<ApproveOutcome> {
        let mut submission = self
            .channel
            .take(key)
            .await?
            .ok_or(KudosError::SubmissionNotFound(key))?;
        submission.apply_event(SubmissionEvent::Approve)?;

        if let Err(e) = self
            .append_settled(
                &submission.task_id,
                &submission.name,
                submission.reward,
                submission.category,
                &approver.username,
                &submission.submitter,
            )
            .await
        {
            tracing::warn!(%key, "history append failed after claim: {e}");
        }

        let new_balance = self
            .ledger
            .credit(&submission.submitter, submission.reward)
            .await?;

        tracing::info!(
            %key,
            submitter = %submission.submitter,
            reward = submission.reward,
            new_balance,
            "submission approved"
        );
        Ok(ApproveOutcome {
            submitter: submission.submitter,
            submitter_name: submission.submitter_name,
            task_name: submission.name,
            reward: submission.reward,
            new_balance,
        })
    }

    /// Reject a pending submission. The record is discarded: no history, no
    /// ledger change. Shares the claim semantics of [`approve`], so a
    /// concurrent settle elsewhere surfaces as `SubmissionNotFound`.
    ///
    /// [`approve`]: ApprovalEngine::approve
    pub async fn reject(&self, key: Uuid) -> Result<RejectOutcome> {
        let mut submission = self
            .channel
            .take(key)
            .await?
            .ok_or(KudosError::SubmissionNotFound(key))?;
        submission.apply_event(SubmissionEvent::Reject)?;

        tracing::info!(%key, submitter = %submission.submitter, "submission rejected");
        Ok(RejectOutcome {
            submitter_name: submission.submitter_name,
            task_name: submission.name,
        })
    }

    /// Apply a penalty directly, bypassing the pending workflow. The debit
    /// clamps at zero; the history record carries the full cost regardless.
    pub async fn apply_penalty(
        &self,
        penalty_id: &str,
        target: &str,
        actor: &User,
    ) -> Result<PenaltyOutcome> {
        if target.trim().is_empty() {
            return Err(KudosError::Validation("no penalty target selected".into()));
        }
        let def = self.resolve(Category::Penalty, penalty_id).await?;

        let new_balance = self.ledger.debit(target, def.points).await?;
        self.append_settled(
            &def.id,
            &def.name,
            -def.points,
            Category::Penalty,
            &actor.username,
            target,
        )
        .await?;

        tracing::info!(penalty_id, target, cost = def.points, new_balance, "penalty applied");
        Ok(PenaltyOutcome {
            penalty_name: def.name,
            cost: def.points,
            new_balance,
        })
    }

    /// Redeem a store item. Unlike penalties, purchases pre-check the
    /// balance and never overdraw.
    pub async fn buy_item(&self, item_id: &str, buyer: &User) -> Result<PurchaseOutcome> {
        let def = self.resolve(Category::Store, item_id).await?;

        let available = self.ledger.balance(&buyer.username).await?;
        if available < def.points {
            return Err(KudosError::InsufficientFunds {
                needed: def.points,
                available,
            });
        }

        let new_balance = self.ledger.debit(&buyer.username, def.points).await?;
        self.append_settled(
            &def.id,
            &def.name,
            -def.points,
            Category::Store,
            &buyer.username,
            &buyer.username,
        )
        .await?;

        tracing::info!(item_id, buyer = %buyer.username, cost = def.points, "item redeemed");
        Ok(PurchaseOutcome {
            item_name: def.name,
            cost: def.points,
            new_balance,
        })
    }

    /// Administrative shortcut: credit a task the requester never formally
    /// claimed. Same ledger mutation and history append as an approval, but
    /// with no submission to consume; the history append is best-effort and
    /// never masks the credit result.
    pub async fn quick_approve(
        &self,
        category: Category,
        task_id: &str,
        target: &str,
        actor: &User,
    ) -> Result<ApproveOutcome> {
        if target.trim().is_empty() {
            return Err(KudosError::Validation("no award target selected".into()));
        }
        if !category.is_claimable() {
            return Err(KudosError::Validation(format!(
                "{category:?} entries cannot be quick-approved"
            )));
        }
        let def = self.resolve(category, task_id).await?;

        let new_balance = self.ledger.credit(target, def.points).await?;
        if let Err(e) = self
            .append_settled(
                &def.id,
                &def.name,
                def.points,
                def.category,
                &actor.username,
                target,
            )
            .await
        {
            tracing::warn!(task_id, target, "history append failed for quick approve: {e}");
        }

        tracing::info!(task_id, target, reward = def.points, new_balance, "quick approve");
        Ok(ApproveOutcome {
            submitter: target.to_string(),
            submitter_name: target.to_string(),
            task_name: def.name,
            reward: def.points,
            new_balance,
        })
    }

    async fn resolve(&self, category: Category, id: &str) -> Result<TaskDefinition> {
        self.catalog
            .resolve(category, id)
            .await?
            .ok_or_else(|| KudosError::TaskNotFound(id.to_string()))
    }

    async fn append_settled(
        &self,
        task_id: &str,
        name: &str,
        points: i64,
        category: Category,
        actor: &str,
        counterpart: &str,
    ) -> Result<()> {
        let previous_hash = self.history.latest_hash().await?;
        let record = HistoryRecord::new(
            task_id,
            name,
            points,
            category,
            actor,
            counterpart,
            previous_hash,
        );
        self.history.append(record).await
    }
}
