//! Migration steps shipped with this build.

use async_trait::async_trait;

use super::MigrationStep;
use crate::error::StepError;
use crate::persist::PersistentStoreAdapter;

/// Version 1: the baseline payload layout.
///
/// Records written by this build already have the current shape, so the step
/// leaves storage untouched. Running it only moves the migration record to
/// version 1. Later steps that actually rewrite payloads are passed in
/// through [`MigrationPlan::new`](super::MigrationPlan::new).
#[derive(Debug, Clone, Copy, Default)]
pub struct Baseline;

#[async_trait]
impl MigrationStep for Baseline {
    fn version(&self) -> u32 {
        1
    }

    fn description(&self) -> &str {
        "baseline payload layout"
    }

    async fn apply(&self, _storage: &PersistentStoreAdapter) -> Result<(), StepError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exilence_storage::InMemoryStore;

    #[tokio::test]
    async fn test_baseline_leaves_records_untouched() {
        let storage = PersistentStoreAdapter::new(InMemoryStore::with_records([
            ("custom-price", r#"{"someone":"else"}"#),
            ("uiState", r#"{"sidenavOpen":true}"#),
        ]));
        let before = storage.list().await.unwrap();

        Baseline.apply(&storage).await.unwrap();

        assert_eq!(storage.list().await.unwrap(), before);
        assert_eq!(
            storage.load("custom-price").await.unwrap().as_deref(),
            Some(r#"{"someone":"else"}"#)
        );
        assert_eq!(storage.load("customPrice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_baseline_on_empty_storage_writes_nothing() {
        let storage = PersistentStoreAdapter::in_memory();
        Baseline.apply(&storage).await.unwrap();
        Baseline.apply(&storage).await.unwrap();
        assert!(storage.list().await.unwrap().is_empty());
    }
}
