use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use kudos_types::{Category, KudosError, TaskDefinition};

use crate::traits::Catalog;

/// In-memory catalog with admin CRUD.
///
/// Definitions live in one list in insertion order; the catalog is small
/// enough that linear scans beat index upkeep.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    definitions: Arc<RwLock<Vec<TaskDefinition>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog seeded with the built-in defaults.
    pub fn with_defaults() -> Self {
        Self {
            definitions: Arc::new(RwLock::new(crate::defaults::default_definitions())),
        }
    }

    /// Add a definition after validation. Duplicate (category, id) pairs are
    /// rejected.
    pub async fn add(&self, def: TaskDefinition) -> Result<(), KudosError> {
        def.validate()?;
        let mut defs = self.definitions.write().await;
        if defs
            .iter()
            .any(|d| d.category == def.category && d.id == def.id)
        {
            return Err(KudosError::Validation(format!(
                "definition already exists: {}",
                def.id
            )));
        }
        defs.push(def);
        Ok(())
    }

    /// Replace the name/points/icon of an existing definition.
    pub async fn update(
        &self,
        category: Category,
        id: &str,
        name: Option<String>,
        points: Option<i64>,
        icon: Option<String>,
    ) -> Result<TaskDefinition, KudosError> {
        let mut defs = self.definitions.write().await;
        let def = defs
            .iter_mut()
            .find(|d| d.category == category && d.id == id)
            .ok_or_else(|| KudosError::TaskNotFound(id.to_string()))?;

        let mut updated = def.clone();
        if let Some(name) = name {
            updated.name = name;
        }
        if let Some(points) = points {
            updated.points = points;
        }
        if let Some(icon) = icon {
            updated.icon = icon;
        }
        updated.validate()?;
        *def = updated.clone();
        Ok(updated)
    }

    /// Delete a definition.
    pub async fn remove(&self, category: Category, id: &str) -> Result<(), KudosError> {
        let mut defs = self.definitions.write().await;
        let before = defs.len();
        defs.retain(|d| !(d.category == category && d.id == id));
        if defs.len() == before {
            return Err(KudosError::TaskNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Flip the enabled gate. Disabled definitions stay in the catalog but
    /// stop resolving.
    pub async fn toggle(&self, category: Category, id: &str) -> Result<bool, KudosError> {
        let mut defs = self.definitions.write().await;
        let def = defs
            .iter_mut()
            .find(|d| d.category == category && d.id == id)
            .ok_or_else(|| KudosError::TaskNotFound(id.to_string()))?;
        def.enabled = !def.enabled;
        Ok(def.enabled)
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn resolve(
        &self,
        category: Category,
        id: &str,
    ) -> Result<Option<TaskDefinition>, KudosError> {
        let defs = self.definitions.read().await;
        Ok(defs
            .iter()
            .find(|d| d.category == category && d.id == id && d.enabled)
            .cloned())
    }

    async fn list_enabled(&self, category: Category) -> Result<Vec<TaskDefinition>, KudosError> {
        let defs = self.definitions.read().await;
        Ok(defs
            .iter()
            .filter(|d| d.category == category && d.enabled)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_resolve() {
        let catalog = InMemoryCatalog::new();
        catalog
            .add(TaskDefinition::new(
                Category::Daily,
                "d1",
                "Morning reading",
                3,
                "📖",
            ))
            .await
            .unwrap();

        let def = catalog.resolve(Category::Daily, "d1").await.unwrap();
        assert_eq!(def.unwrap().points, 3);
        assert!(
            catalog
                .resolve(Category::Core, "d1")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let catalog = InMemoryCatalog::new();
        let def = TaskDefinition::new(Category::Core, "c1", "Homework", 10, "📝");
        catalog.add(def.clone()).await.unwrap();
        assert!(catalog.add(def).await.is_err());
    }

    #[tokio::test]
    async fn test_disabled_does_not_resolve() {
        let catalog = InMemoryCatalog::new();
        catalog
            .add(TaskDefinition::new(
                Category::Store,
                "s1",
                "Screen time 30min",
                50,
                "🎮",
            ))
            .await
            .unwrap();

        let enabled = catalog.toggle(Category::Store, "s1").await.unwrap();
        assert!(!enabled);
        assert!(
            catalog
                .resolve(Category::Store, "s1")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            catalog
                .list_enabled(Category::Store)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_update_validates() {
        let catalog = InMemoryCatalog::new();
        catalog
            .add(TaskDefinition::new(
                Category::Penalty,
                "p2",
                "Dawdling",
                10,
                "🐢",
            ))
            .await
            .unwrap();

        let result = catalog
            .update(Category::Penalty, "p2", None, Some(0), None)
            .await;
        assert!(result.is_err());

        let updated = catalog
            .update(Category::Penalty, "p2", None, Some(15), None)
            .await
            .unwrap();
        assert_eq!(updated.points, 15);
    }

    #[tokio::test]
    async fn test_defaults_seeded() {
        let catalog = InMemoryCatalog::with_defaults();
        assert!(!catalog.list_enabled(Category::Core).await.unwrap().is_empty());
        assert!(
            !catalog
                .list_enabled(Category::Penalty)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            !catalog
                .list_enabled(Category::Store)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
