/// Shared error taxonomy for the persistence layer
///
/// Both store backends (Postgres and in-memory) and the use-case layer
/// report failures through this enum, so callers can match on outcomes
/// without knowing which backend is behind the trait.
///
/// The HTTP layer owns the mapping from these variants to status codes;
/// nothing here carries transport concerns.

use uuid::Uuid;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with the same business id already exists
    #[error("id '{0}' already exists")]
    DuplicateId(Uuid),

    /// A user with the same username already exists
    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    /// No record matched the lookup key
    #[error("no matching record found")]
    NotFound,

    /// The requesting user does not own the record
    #[error("user '{0}' is not the owner of this record")]
    Unauthorized(Uuid),

    /// First user in an empty identity store must be an admin
    #[error("only an ADMIN can be the first user")]
    BootstrapViolation,

    /// The store did not answer within the configured deadline
    #[error("store operation timed out")]
    Timeout,

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;
