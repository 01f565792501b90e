/// HTTP route handlers
///
/// - [`health`]: liveness and database connectivity
/// - [`users`]: registration, login, token refresh, account management
/// - [`tasks`]: task CRUD with creator-only mutation

pub mod health;
pub mod tasks;
pub mod users;
