/// Database plumbing
///
/// - `pool`: PostgreSQL connection pool construction and health check
/// - `migrations`: embedded schema migrations

pub mod migrations;
pub mod pool;
