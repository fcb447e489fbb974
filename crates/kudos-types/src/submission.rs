use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Category, TaskDefinition};
use crate::error::KudosError;
use crate::user::User;

/// Submission lifecycle states.
///
/// Only `Pending` is ever stored on the channel: an approval survives as a
/// history record and a rejection is discarded, so both terminal states exist
/// only in transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Pending,
    Approved,
    Rejected,
}

/// Events that settle a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionEvent {
    Approve,
    Reject,
}

impl SubmissionState {
    /// Attempt a state transition given an event.
    /// Returns the new state or an error if the transition is invalid.
    pub fn transition(self, event: SubmissionEvent) -> crate::error::Result<SubmissionState> {
        match (self, event) {
            (SubmissionState::Pending, SubmissionEvent::Approve) => Ok(SubmissionState::Approved),
            (SubmissionState::Pending, SubmissionEvent::Reject) => Ok(SubmissionState::Rejected),

            // Both terminal states reject every event
            (state, event) => Err(KudosError::InvalidStateTransition { from: state, event }),
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, SubmissionState::Pending)
    }
}

/// One in-flight claim by a requester against a task definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Channel-assigned key. Opaque and ordering-free.
    pub key: Uuid,
    pub task_id: String,
    pub name: String,
    pub reward: i64,
    pub category: Category,
    pub submitter: String,
    pub submitter_name: String,
    pub note: Option<String>,
    pub state: SubmissionState,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Materialize an accepted claim. Called by the channel, which owns key
    /// assignment and the server-side timestamp.
    pub fn accept(new: NewSubmission, key: Uuid) -> Self {
        Self {
            key,
            task_id: new.task_id,
            name: new.name,
            reward: new.reward,
            category: new.category,
            submitter: new.submitter,
            submitter_name: new.submitter_name,
            note: new.note,
            state: SubmissionState::Pending,
            created_at: Utc::now(),
        }
    }

    /// Apply a settling event.
    pub fn apply_event(&mut self, event: SubmissionEvent) -> crate::error::Result<()> {
        self.state = self.state.transition(event)?;
        Ok(())
    }
}

/// A claim as handed to the channel, before a key and server timestamp exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub task_id: String,
    pub name: String,
    pub reward: i64,
    pub category: Category,
    pub submitter: String,
    pub submitter_name: String,
    pub note: Option<String>,
}

impl NewSubmission {
    pub fn claim(def: &TaskDefinition, submitter: &User, note: Option<String>) -> Self {
        Self {
            task_id: def.id.clone(),
            name: def.name.clone(),
            reward: def.points,
            category: def.category,
            submitter: submitter.username.clone(),
            submitter_name: submitter.display_name().to_string(),
            note,
        }
    }
}
