/// Domain models for Taskforge
///
/// # Models
///
/// - `user`: user accounts, roles, and session artifacts
/// - `task`: tasks with ownership fields
///
/// Each model is a plain data struct plus a patch type describing the
/// fields a caller may change. Stores accept fully-populated models on
/// create; they never stamp ownership fields themselves.

pub mod task;
pub mod user;

pub use task::{Task, TaskPatch};
pub use user::{User, UserPatch, UserType};
