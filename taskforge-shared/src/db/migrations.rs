/// Embedded schema migrations
///
/// Migration SQL lives in `taskforge-shared/migrations/` and is
/// compiled into the binary with `sqlx::migrate!`, so a deployment
/// needs no migration files on disk. `run_migrations` is called once at
/// startup, before the server accepts traffic.
///
/// The schema carries the unique constraints the stores rely on:
/// `users_user_id_key`, `users_username_key`, and `tasks_task_id_key`.

use sqlx::postgres::PgPool;
use tracing::info;

/// Applies all pending migrations
///
/// Safe to call on every startup; already-applied migrations are
/// skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("database schema is up to date");
    Ok(())
}
