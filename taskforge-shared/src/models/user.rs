/// User model and field validation
///
/// Users carry two identifiers: the storage row id (internal to the
/// Postgres backend, never exposed) and `user_id`, the business id that
/// everything else references. Ownership of tasks, token claims, and
/// the HTTP surface all speak `user_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL,
///     username VARCHAR(25) NOT NULL,
///     first_name VARCHAR(50) NOT NULL,
///     last_name VARCHAR(50) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     user_type user_type NOT NULL,
///     token TEXT,
///     refresh_token TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_user_id_key UNIQUE (user_id),
///     CONSTRAINT users_username_key UNIQUE (username)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationError;

/// Role of a user account
///
/// The first user ever registered must be an `Admin`; the identity
/// store rejects a `User`-typed first registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_type", rename_all = "UPPERCASE")]
pub enum UserType {
    Admin,
    User,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "ADMIN",
            UserType::User => "USER",
        }
    }
}

/// User account
///
/// `password_hash` is an Argon2id PHC string; the plaintext password
/// never reaches this struct. `token` / `refresh_token` hold the most
/// recently issued session artifacts for lookup only; token validation
/// is stateless and signature-based.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Business id, generated at registration
    pub user_id: Uuid,

    /// Unique username (letter first, then alphanumeric/underscore, 5-25 chars)
    pub username: String,

    pub first_name: String,

    pub last_name: String,

    /// Argon2id hash, never serialized out
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub user_type: UserType,

    /// Most recently issued access token
    #[serde(skip_serializing, default)]
    pub token: Option<String>,

    /// Most recently issued refresh token
    #[serde(skip_serializing, default)]
    pub refresh_token: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Fields a caller may change on an existing user
///
/// Only non-None fields are applied; the store stamps `updated_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

/// Validates the username shape: starts with a letter, then only
/// alphanumerics and underscores. Length bounds are checked separately
/// by the request DTO.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let mut chars = username.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("username_format").with_message(
            "username must start with a letter and contain only letters, digits, and underscores"
                .into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_wire_form() {
        assert_eq!(serde_json::to_string(&UserType::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&UserType::User).unwrap(), "\"USER\"");
        assert_eq!(UserType::Admin.as_str(), "ADMIN");
    }

    #[test]
    fn test_validate_username_accepts_well_formed() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("alice_w99").is_ok());
        assert!(validate_username("Bob_the_2nd").is_ok());
    }

    #[test]
    fn test_validate_username_rejects_malformed() {
        assert!(validate_username("").is_err());
        assert!(validate_username("1alice").is_err());
        assert!(validate_username("_alice").is_err());
        assert!(validate_username("alice-w").is_err());
        assert!(validate_username("alice w").is_err());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Walker".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            user_type: UserType::Admin,
            token: Some("tok".to_string()),
            refresh_token: Some("refresh".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("refresh_token"));
    }

    #[test]
    fn test_user_patch_is_empty() {
        assert!(UserPatch::default().is_empty());
        assert!(!UserPatch {
            first_name: Some("Alice".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
