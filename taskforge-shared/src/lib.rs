//! # Taskforge Shared Library
//!
//! Shared types and business logic for the Taskforge API server.
//!
//! ## Module Organization
//!
//! - `models`: domain models (users, tasks) and patch types
//! - `auth`: password hashing and the session token service
//! - `store`: store traits plus the Postgres and in-memory backends
//! - `usecase`: deadline-bounded pass-through over the stores
//! - `db`: connection pool and embedded migrations
//! - `error`: the shared store error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod store;
pub mod usecase;

/// Current version of the Taskforge shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
