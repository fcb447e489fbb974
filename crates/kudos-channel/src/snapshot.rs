use std::collections::HashMap;

use uuid::Uuid;

use kudos_types::Submission;

/// The full current set of live submissions as last delivered by the channel.
///
/// Rebuilt wholesale on every channel event, never diffed. Immutable once
/// built — engine checks run against a snapshot value, so a concurrent write
/// elsewhere never shifts the ground under a decision mid-operation.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    items: Vec<Submission>,
    index: HashMap<Uuid, usize>,
}

impl Snapshot {
    /// Build from an unordered set: pending entries first, then by
    /// descending creation time.
    pub fn from_unordered(mut items: Vec<Submission>) -> Self {
        items.sort_by(|a, b| {
            let a_settled = a.state.is_terminal();
            let b_settled = b.state.is_terminal();
            a_settled
                .cmp(&b_settled)
                .then(b.created_at.cmp(&a.created_at))
        });
        let index = items.iter().enumerate().map(|(i, s)| (s.key, i)).collect();
        Self { items, index }
    }

    pub fn get(&self, key: Uuid) -> Option<&Submission> {
        self.index.get(&key).and_then(|i| self.items.get(*i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Submission> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a live claim already exists for this (task, submitter) pair.
    pub fn has_pending(&self, task_id: &str, submitter: &str) -> bool {
        self.items.iter().any(|s| {
            !s.state.is_terminal() && s.task_id == task_id && s.submitter == submitter
        })
    }

    /// Pending submissions, optionally filtered to one submitter.
    pub fn pending(&self, submitter: Option<&str>) -> Vec<&Submission> {
        self.items
            .iter()
            .filter(|s| !s.state.is_terminal())
            .filter(|s| submitter.is_none_or(|u| s.submitter == u))
            .collect()
    }
}
