use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{KudosError, Result};

/// Catalog categories. The first three are claimable tasks; penalties and
/// store items are settled directly by an admin without a pending phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Core,
    Daily,
    Bounty,
    Penalty,
    Store,
}

impl Category {
    /// Whether definitions in this category go through the submission workflow.
    pub fn is_claimable(self) -> bool {
        matches!(self, Category::Core | Category::Daily | Category::Bounty)
    }
}

/// A catalog entry: a claimable task, a penalty, or a purchasable item.
///
/// `points` is the reward for claimable categories and the cost for
/// penalty/store entries; it is always positive here and signed only when it
/// lands in the history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub icon: String,
    pub enabled: bool,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

impl TaskDefinition {
    pub fn new(
        category: Category,
        id: impl Into<String>,
        name: impl Into<String>,
        points: i64,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            points,
            icon: icon.into(),
            enabled: true,
            category,
            created_at: Utc::now(),
        }
    }

    /// Malformed definitions are rejected before they enter the catalog.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(KudosError::Validation("name must not be empty".into()));
        }
        if self.points < 1 {
            return Err(KudosError::Validation(format!(
                "points must be positive, got {}",
                self.points
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_definition() {
        let def = TaskDefinition::new(Category::Daily, "d1", "Practice violin 30min", 5, "🎻");
        assert!(def.validate().is_ok());
        assert!(def.enabled);
    }

    #[test]
    fn test_empty_name_rejected() {
        let def = TaskDefinition::new(Category::Core, "c1", "   ", 10, "⭐");
        assert!(matches!(def.validate(), Err(KudosError::Validation(_))));
    }

    #[test]
    fn test_non_positive_points_rejected() {
        let def = TaskDefinition::new(Category::Store, "s1", "Movie night", 0, "🎬");
        assert!(matches!(def.validate(), Err(KudosError::Validation(_))));
    }

    #[test]
    fn test_claimable_categories() {
        assert!(Category::Core.is_claimable());
        assert!(Category::Daily.is_claimable());
        assert!(Category::Bounty.is_claimable());
        assert!(!Category::Penalty.is_claimable());
        assert!(!Category::Store.is_claimable());
    }
}
