/// Task use cases
///
/// Pass-through over `TaskStore` with the deployment's deadline
/// applied to every call. No business validation happens here; the
/// store owns the ownership and uniqueness rules, the handlers own
/// input validation.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::task::{Task, TaskPatch};
use crate::store::TaskStore;

use super::bounded;

#[derive(Clone)]
pub struct TaskUsecase {
    store: Arc<dyn TaskStore>,
    timeout: Duration,
}

impl TaskUsecase {
    pub fn new(store: Arc<dyn TaskStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn create(&self, task: &Task) -> StoreResult<()> {
        bounded(self.timeout, self.store.create(task)).await
    }

    pub async fn fetch_all(&self) -> StoreResult<Vec<Task>> {
        bounded(self.timeout, self.store.fetch_all()).await
    }

    pub async fn fetch_by_id(&self, task_id: Uuid) -> StoreResult<Task> {
        bounded(self.timeout, self.store.fetch_by_id(task_id)).await
    }

    pub async fn update_by_id(
        &self,
        task_id: Uuid,
        requesting_user: Uuid,
        patch: &TaskPatch,
    ) -> StoreResult<Task> {
        bounded(
            self.timeout,
            self.store.update_by_id(task_id, requesting_user, patch),
        )
        .await
    }

    pub async fn delete_by_id(&self, task_id: Uuid, requesting_user: Uuid) -> StoreResult<()> {
        bounded(
            self.timeout,
            self.store.delete_by_id(task_id, requesting_user),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::InMemoryTaskStore;
    use async_trait::async_trait;

    /// Store whose calls never complete, for deadline tests
    struct StalledTaskStore;

    #[async_trait]
    impl TaskStore for StalledTaskStore {
        async fn create(&self, _task: &Task) -> StoreResult<()> {
            std::future::pending().await
        }
        async fn fetch_all(&self) -> StoreResult<Vec<Task>> {
            std::future::pending().await
        }
        async fn fetch_by_id(&self, _task_id: Uuid) -> StoreResult<Task> {
            std::future::pending().await
        }
        async fn update_by_id(
            &self,
            _task_id: Uuid,
            _requesting_user: Uuid,
            _patch: &TaskPatch,
        ) -> StoreResult<Task> {
            std::future::pending().await
        }
        async fn delete_by_id(&self, _task_id: Uuid, _requesting_user: Uuid) -> StoreResult<()> {
            std::future::pending().await
        }
    }

    fn sample_task(owner: Uuid) -> Task {
        Task::new(
            "Write report".to_string(),
            String::new(),
            "open".to_string(),
            None,
            None,
            owner,
        )
    }

    #[tokio::test]
    async fn test_passes_store_results_through() {
        let usecase = TaskUsecase::new(
            Arc::new(InMemoryTaskStore::new()),
            Duration::from_secs(5),
        );
        let owner = Uuid::new_v4();
        let task = sample_task(owner);

        usecase.create(&task).await.expect("create should succeed");
        let fetched = usecase.fetch_by_id(task.task_id).await.unwrap();
        assert_eq!(fetched.title, task.title);

        // store errors cross this layer unchanged
        let result = usecase.delete_by_id(task.task_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::Unauthorized(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_store_surfaces_timeout() {
        let usecase = TaskUsecase::new(Arc::new(StalledTaskStore), Duration::from_millis(100));
        let task = sample_task(Uuid::new_v4());

        assert!(matches!(
            usecase.create(&task).await,
            Err(StoreError::Timeout)
        ));
        assert!(matches!(
            usecase.fetch_all().await,
            Err(StoreError::Timeout)
        ));
    }
}
