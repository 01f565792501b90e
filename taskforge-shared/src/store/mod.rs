/// Store capability traits
///
/// The rest of the system only ever talks to these traits; which
/// backend sits behind them is a wiring decision. The Postgres
/// implementation is the production one, the in-memory implementation
/// backs tests that need store semantics without a database.
///
/// Two rules both backends must uphold identically:
///
/// - **Ownership**: `update_by_id` / `delete_by_id` on a task verify
///   that the requesting user matches the task's `created_by` and fail
///   with `StoreError::Unauthorized` otherwise. This is enforced here,
///   at the store boundary, not in the handlers.
/// - **Creation-order checks**: creating a user checks duplicate id,
///   then duplicate username, then the first-user-must-be-admin rule,
///   short-circuiting on the first failure.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::task::{Task, TaskPatch};
use crate::models::user::{User, UserPatch};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryIdentityStore, InMemoryTaskStore};
pub use postgres::{PgIdentityStore, PgTaskStore};

/// Persistence operations for tasks
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a fully-populated task. Fails with `DuplicateId` if the
    /// business id is already taken. The caller stamps ownership and
    /// timestamps; the store never does.
    async fn create(&self, task: &Task) -> StoreResult<()>;

    /// Returns every task, unfiltered. Task reads are public.
    async fn fetch_all(&self) -> StoreResult<Vec<Task>>;

    /// Fails with `NotFound` if absent. No ownership check on reads.
    async fn fetch_by_id(&self, task_id: Uuid) -> StoreResult<Task>;

    /// Applies the patch and stamps `updated_by`/`updated_at`.
    /// `created_by`/`created_at` are immutable. Fails with `NotFound`
    /// if no task matches, `Unauthorized` if `requesting_user` is not
    /// the recorded creator.
    async fn update_by_id(
        &self,
        task_id: Uuid,
        requesting_user: Uuid,
        patch: &TaskPatch,
    ) -> StoreResult<Task>;

    /// Same ownership gate as `update_by_id`.
    async fn delete_by_id(&self, task_id: Uuid, requesting_user: Uuid) -> StoreResult<()>;
}

/// Persistence operations for user identities
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Inserts a fully-populated user, running the ordered checks:
    /// `DuplicateId`, then `DuplicateUsername`, then
    /// `BootstrapViolation` when the store is empty and the user is
    /// not an admin.
    async fn create(&self, user: &User) -> StoreResult<()>;

    async fn fetch_all(&self) -> StoreResult<Vec<User>>;

    async fn fetch_by_id(&self, user_id: Uuid) -> StoreResult<User>;

    async fn get_by_username(&self, username: &str) -> StoreResult<User>;

    /// Applies the patch and stamps `updated_at`. Fails with
    /// `NotFound` if absent. Which identities may call this is the
    /// controller's concern; the id always comes from validated
    /// claims, never from client input.
    async fn update_by_id(&self, user_id: Uuid, patch: &UserPatch) -> StoreResult<User>;

    /// Fails with `NotFound` if absent; deleting an already-absent id
    /// is an error, not a silent success.
    async fn delete_by_id(&self, user_id: Uuid) -> StoreResult<()>;

    /// Overwrites the persisted session artifacts and stamps
    /// `updated_at`. Fails with `NotFound` if absent.
    async fn update_session_tokens(
        &self,
        user_id: Uuid,
        token: &str,
        refresh_token: &str,
    ) -> StoreResult<()>;
}
