use serde::{Deserialize, Serialize};

/// Result of a successful approve or quick-approve: what was credited, to
/// whom, and the balance afterwards. The UI layer owns presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveOutcome {
    pub submitter: String,
    pub submitter_name: String,
    pub task_name: String,
    pub reward: i64,
    pub new_balance: i64,
}

/// Result of a rejection. No points moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectOutcome {
    pub submitter_name: String,
    pub task_name: String,
}

/// Result of a directly applied penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyOutcome {
    pub penalty_name: String,
    pub cost: i64,
    pub new_balance: i64,
}

/// Result of a store purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    pub item_name: String,
    pub cost: i64,
    pub new_balance: i64,
}
