/// Task model
///
/// Tasks record who created them in `created_by`, and that field is the
/// load-bearing one: the task store refuses updates and deletes from any
/// other identity. `created_by`/`created_at` are immutable after insert;
/// `updated_by`/`updated_at` are stamped by the store on every mutation.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL,
///     title VARCHAR(50) NOT NULL,
///     description VARCHAR(100) NOT NULL DEFAULT '',
///     status VARCHAR(50) NOT NULL DEFAULT '',
///     start_date TIMESTAMPTZ,
///     due_date TIMESTAMPTZ,
///     created_by UUID NOT NULL,
///     updated_by UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tasks_task_id_key UNIQUE (task_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task owned by the user recorded in `created_by`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Business id, generated at creation
    pub task_id: Uuid,

    /// Required, 4-50 chars
    pub title: String,

    /// Up to 100 chars
    pub description: String,

    /// Free-form status label
    pub status: String,

    pub start_date: Option<DateTime<Utc>>,

    pub due_date: Option<DateTime<Utc>>,

    /// Identity of the creating user, immutable after insert
    pub created_by: Uuid,

    /// Identity of the most recent modifier
    pub updated_by: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Fields a caller may change on an existing task
///
/// Only non-None fields are applied. Ownership and creation fields are
/// not representable here on purpose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a new task owned by `created_by`, with a fresh business id
    /// and both timestamps set to now.
    pub fn new(
        title: String,
        description: String,
        status: String,
        start_date: Option<DateTime<Utc>>,
        due_date: Option<DateTime<Utc>>,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            task_id: Uuid::new_v4(),
            title,
            description,
            status,
            start_date,
            due_date,
            created_by,
            updated_by: created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a patch in place and stamps the modifier. Store backends
    /// that hold tasks in process memory use this; the Postgres backend
    /// expresses the same rules in SQL.
    pub fn apply_patch(&mut self, patch: &TaskPatch, updated_by: Uuid) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(status) = &patch.status {
            self.status = status.clone();
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = Some(start_date);
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_by = updated_by;
        self.updated_at = Utc::now();
    }
}
