/// In-memory store implementations
///
/// Process-local stores behind the same traits as the Postgres
/// backends, with the same error semantics: ownership gates, ordered
/// creation checks, `NotFound` on absent deletes. Unit tests and the
/// router-level integration tests run against these, so store-boundary
/// behavior is exercised without a database.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::task::{Task, TaskPatch};
use crate::models::user::{User, UserPatch, UserType};

use super::{IdentityStore, TaskStore};

/// Task store over a shared map keyed by business id
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: &Task) -> StoreResult<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.task_id) {
            return Err(StoreError::DuplicateId(task.task_id));
        }
        tasks.insert(task.task_id, task.clone());
        Ok(())
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by_key(|t| t.created_at);
        Ok(all)
    }

    async fn fetch_by_id(&self, task_id: Uuid) -> StoreResult<Task> {
        let tasks = self.tasks.read().await;
        tasks.get(&task_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_by_id(
        &self,
        task_id: Uuid,
        requesting_user: Uuid,
        patch: &TaskPatch,
    ) -> StoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(&task_id).ok_or(StoreError::NotFound)?;
        if task.created_by != requesting_user {
            return Err(StoreError::Unauthorized(requesting_user));
        }
        task.apply_patch(patch, requesting_user);
        Ok(task.clone())
    }

    async fn delete_by_id(&self, task_id: Uuid, requesting_user: Uuid) -> StoreResult<()> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get(&task_id).ok_or(StoreError::NotFound)?;
        if task.created_by != requesting_user {
            return Err(StoreError::Unauthorized(requesting_user));
        }
        tasks.remove(&task_id);
        Ok(())
    }
}

/// Identity store over a shared map keyed by business id
#[derive(Clone, Default)]
pub struct InMemoryIdentityStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn create(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.user_id) {
            return Err(StoreError::DuplicateId(user.user_id));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername(user.username.clone()));
        }
        if users.is_empty() && user.user_type != UserType::Admin {
            return Err(StoreError::BootstrapViolation);
        }

        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn fetch_all(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn fetch_by_id(&self, user_id: Uuid) -> StoreResult<User> {
        let users = self.users.read().await;
        users.get(&user_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn get_by_username(&self, username: &str) -> StoreResult<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, user_id: Uuid, patch: &UserPatch) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;

        if let Some(first_name) = &patch.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            user.last_name = last_name.clone();
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_by_id(&self, user_id: Uuid) -> StoreResult<()> {
        let mut users = self.users.write().await;
        users.remove(&user_id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    async fn update_session_tokens(
        &self,
        user_id: Uuid,
        token: &str,
        refresh_token: &str,
    ) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.token = Some(token.to_string());
        user.refresh_token = Some(refresh_token.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }
}
