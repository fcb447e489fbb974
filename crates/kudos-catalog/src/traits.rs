use async_trait::async_trait;

use kudos_types::{Category, KudosError, TaskDefinition};

/// Read-only catalog lookup as consumed by the approval engine.
///
/// The engine only ever reads points and the enabled gate at the moment of
/// action; definition management happens behind this trait.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolve a definition by category and id. Disabled definitions resolve
    /// to `None`, indistinguishable from missing ones.
    async fn resolve(
        &self,
        category: Category,
        id: &str,
    ) -> Result<Option<TaskDefinition>, KudosError>;

    /// All enabled definitions in a category, in insertion order.
    async fn list_enabled(&self, category: Category) -> Result<Vec<TaskDefinition>, KudosError>;
}
