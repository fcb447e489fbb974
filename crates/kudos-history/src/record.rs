use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kudos_types::Category;

/// An immutable settled-event record: the only durable trace of an approval,
/// penalty, or purchase.
///
/// `points` is signed: positive for approvals, negative for penalties and
/// purchases. `actor` is who acted (the approving admin, or the buyer);
/// `counterpart` is whose balance moved. Records chain through
/// `previous_hash` so any later edit of the log is detectable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub task_id: String,
    pub name: String,
    pub points: i64,
    pub category: Category,
    pub actor: String,
    pub counterpart: String,
    pub finished_at: DateTime<Utc>,
    pub previous_hash: Option<String>,
    pub hash: String,
}

impl HistoryRecord {
    pub fn new(
        task_id: impl Into<String>,
        name: impl Into<String>,
        points: i64,
        category: Category,
        actor: impl Into<String>,
        counterpart: impl Into<String>,
        previous_hash: Option<String>,
    ) -> Self {
        let id = Uuid::new_v4();
        let finished_at = Utc::now();
        let task_id = task_id.into();
        let name = name.into();
        let actor = actor.into();
        let counterpart = counterpart.into();

        let hash_input = format!(
            "{}:{}:{}:{}:{}:{:?}:{}:{}:{}",
            id,
            finished_at.timestamp_nanos_opt().unwrap_or(0),
            task_id,
            name,
            points,
            category,
            actor,
            counterpart,
            previous_hash.as_deref().unwrap_or("genesis"),
        );

        // Non-cryptographic chain hash — tamper evidence, not tamper proof.
        let hash = format!("{:x}", fnv_hash(hash_input.as_bytes()));

        Self {
            id,
            task_id,
            name,
            points,
            category,
            actor,
            counterpart,
            finished_at,
            previous_hash,
            hash,
        }
    }
}

fn fnv_hash(data: &[u8]) -> u128 {
    let mut h: u128 = 0xcbf29ce484222325;
    for &b in data {
        h = h.wrapping_mul(0x100000001b3);
        h ^= b as u128;
    }
    h
}
