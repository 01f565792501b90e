/// Postgres-backed store implementations
///
/// Ownership checks for tasks are expressed in the mutation queries
/// themselves (`WHERE task_id = $1 AND created_by = $2`), so the gate
/// and the write are one statement. When such a statement matches
/// nothing, a follow-up existence probe decides between `NotFound` and
/// `Unauthorized`.
///
/// Uniqueness is enforced twice on purpose: ordered read-side checks
/// give callers the precise error the contract promises, and the
/// schema's unique constraints close the window between two concurrent
/// creates: a racing loser surfaces the same `DuplicateId` /
/// `DuplicateUsername` through constraint-name mapping.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::task::{Task, TaskPatch};
use crate::models::user::{User, UserPatch, UserType};

use super::{IdentityStore, TaskStore};

const TASK_COLUMNS: &str = "task_id, title, description, status, start_date, due_date, \
                            created_by, updated_by, created_at, updated_at";

const USER_COLUMNS: &str = "user_id, username, first_name, last_name, password_hash, \
                            user_type, token, refresh_token, created_at, updated_at";

/// Maps a unique-constraint violation on a user insert to the matching
/// taxonomy error, passing everything else through as a database error.
/// This is the backstop for two concurrent creates that both passed the
/// read-side checks.
fn map_user_constraint(err: sqlx::Error, user: &User) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        match db_err.constraint() {
            Some("users_user_id_key") => return StoreError::DuplicateId(user.user_id),
            Some("users_username_key") => {
                return StoreError::DuplicateUsername(user.username.clone())
            }
            _ => {}
        }
    }
    StoreError::Database(err)
}

/// Task store backed by the `tasks` table
#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, task: &Task) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (task_id, title, description, status, start_date, due_date,
                               created_by, updated_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(task.task_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.start_date)
        .bind(task.due_date)
        .bind(task.created_by)
        .bind(task.updated_by)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!(task_id = %task.task_id, "task created");
                Ok(())
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some("tasks_task_id_key") =>
            {
                Err(StoreError::DuplicateId(task.task_id))
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn fetch_by_id(&self, task_id: Uuid) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = $1"
        ))
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(
        &self,
        task_id: Uuid,
        requesting_user: Uuid,
        patch: &TaskPatch,
    ) -> StoreResult<Task> {
        let updated = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                start_date = COALESCE($6, start_date),
                due_date = COALESCE($7, due_date),
                updated_by = $2,
                updated_at = NOW()
            WHERE task_id = $1 AND created_by = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task_id)
        .bind(requesting_user)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.status)
        .bind(patch.start_date)
        .bind(patch.due_date)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(task) => Ok(task),
            None => Err(self.classify_miss(task_id, requesting_user).await?),
        }
    }

    async fn delete_by_id(&self, task_id: Uuid, requesting_user: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE task_id = $1 AND created_by = $2")
            .bind(task_id)
            .bind(requesting_user)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.classify_miss(task_id, requesting_user).await?);
        }
        debug!(task_id = %task_id, "task deleted");
        Ok(())
    }
}

impl PgTaskStore {
    /// Decides whether an ownership-gated mutation missed because the
    /// task does not exist or because someone else owns it.
    async fn classify_miss(
        &self,
        task_id: Uuid,
        requesting_user: Uuid,
    ) -> Result<StoreError, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE task_id = $1)")
                .bind(task_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(if exists {
            StoreError::Unauthorized(requesting_user)
        } else {
            StoreError::NotFound
        })
    }
}

/// Identity store backed by the `users` table
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn create(&self, user: &User) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let id_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                .bind(user.user_id)
                .fetch_one(&mut *tx)
                .await?;
        if id_taken {
            return Err(StoreError::DuplicateId(user.user_id));
        }

        let username_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(&user.username)
                .fetch_one(&mut *tx)
                .await?;
        if username_taken {
            return Err(StoreError::DuplicateUsername(user.username.clone()));
        }

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        if total == 0 && user.user_type != UserType::Admin {
            return Err(StoreError::BootstrapViolation);
        }

        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, first_name, last_name, password_hash,
                               user_type, token, refresh_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.user_type)
        .bind(&user.token)
        .bind(&user.refresh_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_user_constraint(e, user))?;

        tx.commit().await?;
        debug!(user_id = %user.user_id, username = %user.username, "user created");
        Ok(())
    }

    async fn fetch_all(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn fetch_by_id(&self, user_id: Uuid) -> StoreResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn get_by_username(&self, username: &str) -> StoreResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, user_id: Uuid, patch: &UserPatch) -> StoreResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&patch.first_name)
        .bind(&patch.last_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_by_id(&self, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        debug!(user_id = %user_id, "user deleted");
        Ok(())
    }

    async fn update_session_tokens(
        &self,
        user_id: Uuid,
        token: &str,
        refresh_token: &str,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET token = $2, refresh_token = $3, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(refresh_token)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
