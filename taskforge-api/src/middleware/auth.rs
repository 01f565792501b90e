/// Bearer-token authentication
///
/// Protected handlers declare an [`AuthContext`] argument. Extraction
/// parses the `Authorization: Bearer <token>` header, validates the
/// access token against the application's signing secret, and yields
/// the caller's identity. Any failure rejects the request before the
/// handler body runs.
///
/// # Example
///
/// ```no_run
/// use taskforge_api::middleware::auth::AuthContext;
///
/// async fn protected_handler(auth: AuthContext) -> String {
///     format!("hello, {}", auth.username)
/// }
/// ```
use crate::{app::AppState, error::ApiError};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use taskforge_shared::models::UserType;
use uuid::Uuid;

/// Authenticated caller identity
///
/// Built from validated access-token claims. Handlers use this as the
/// source of truth for ownership and role checks; identity fields in
/// request bodies are ignored.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    pub user_type: UserType,
}

impl AuthContext {
    /// Whether the caller holds the administrator role
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    /// Whether the caller may manage the given user's account
    ///
    /// Users manage themselves; administrators manage anyone.
    pub fn can_manage_user(&self, user_id: Uuid) -> bool {
        self.user_id == user_id || self.is_admin()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized("Missing authorization header".to_string())
            })?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

        let claims = state.tokens.validate_access(token)?;

        Ok(AuthContext {
            user_id: claims.sub,
            username: claims.username,
            user_type: claims.user_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(user_type: UserType) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            username: "somebody".to_string(),
            user_type,
        }
    }

    #[test]
    fn test_admin_can_manage_any_user() {
        let admin = context(UserType::Admin);
        assert!(admin.can_manage_user(Uuid::new_v4()));
    }

    #[test]
    fn test_user_can_manage_only_self() {
        let user = context(UserType::User);
        assert!(user.can_manage_user(user.user_id));
        assert!(!user.can_manage_user(Uuid::new_v4()));
    }
}
