use thiserror::Error;

use crate::submission::{SubmissionEvent, SubmissionState};

#[derive(Debug, Error)]
pub enum KudosError {
    #[error("State transition error: cannot transition from {from:?} via {event:?}")]
    InvalidStateTransition {
        from: SubmissionState,
        event: SubmissionEvent,
    },

    #[error("Task definition not found or disabled: {0}")]
    TaskNotFound(String),

    #[error("Submission not found or already processed: {0}")]
    SubmissionNotFound(uuid::Uuid),

    #[error("Task already submitted and awaiting approval: {0}")]
    AlreadySubmitted(String),

    #[error("Insufficient points: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("Realtime channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, KudosError>;
