/// Session token service
///
/// Issues and validates the signed tokens that carry identity between
/// requests. Tokens are HS256-signed JWTs; the signing secret is
/// injected at construction and lives nowhere else.
///
/// # Token types
///
/// - **Access token**: 24 hours, presented as the bearer token on
///   authenticated routes.
/// - **Refresh token**: 200 hours, exchanged for a new access token.
///   Refresh tokens carry the same identity claims as access tokens so
///   the exchange needs no store lookup.
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::jwt::TokenService;
/// use taskforge_shared::models::user::UserType;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = TokenService::new("a-secret-key-at-least-32-bytes-long!!");
/// let user_id = Uuid::new_v4();
///
/// let session = service.issue_session("alice", UserType::Admin, user_id)?;
/// let claims = service.validate_access(&session.access_token)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserType;

/// Issuer claim stamped into every token
const ISSUER: &str = "taskforge";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign a token
    #[error("failed to create token: {0}")]
    Create(String),

    /// Token has expired
    #[error("token has expired")]
    Expired,

    /// Signature, structure, or claim check failed
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Token is the wrong type for the operation
    #[error("expected a {expected} token")]
    WrongTokenType { expected: &'static str },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    /// Default lifetime per token type
    pub fn lifetime(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::hours(200),
        }
    }
}

/// Identity and policy facts embedded in a signed session token
///
/// Standard claims (`iss`, `iat`, `nbf`, `exp`) plus the identity the
/// middleware threads into each request: subject user id, username, and
/// role. Both token types carry the full set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - business user id
    pub sub: Uuid,

    /// Username at issuance time
    pub username: String,

    /// Role at issuance time
    pub user_type: UserType,

    /// Access or refresh
    pub token_type: TokenType,

    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims with the default lifetime for the token type
    pub fn new(username: &str, user_type: UserType, user_id: Uuid, token_type: TokenType) -> Self {
        Self::with_lifetime(username, user_type, user_id, token_type, token_type.lifetime())
    }

    /// Creates claims with an explicit lifetime (negative durations are
    /// useful in tests to mint already-expired tokens)
    pub fn with_lifetime(
        username: &str,
        user_type: UserType,
        user_id: Uuid,
        token_type: TokenType,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username: username.to_string(),
            user_type,
            token_type,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Whether the expiry instant has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Freshly issued token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and validates session tokens with a single shared secret
///
/// Constructed once from configuration and cloned into whatever needs
/// it; there is no ambient global secret.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issues the access/refresh pair for a user
    ///
    /// Signing failure surfaces as an error; a partial pair is never
    /// returned.
    pub fn issue_session(
        &self,
        username: &str,
        user_type: UserType,
        user_id: Uuid,
    ) -> Result<SessionTokens, JwtError> {
        let access_claims = Claims::new(username, user_type, user_id, TokenType::Access);
        let refresh_claims = Claims::new(username, user_type, user_id, TokenType::Refresh);

        Ok(SessionTokens {
            access_token: self.create_token(&access_claims)?,
            refresh_token: self.create_token(&refresh_claims)?,
        })
    }

    /// Signs a token from the given claims
    pub fn create_token(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&header, claims, &key).map_err(|e| JwtError::Create(e.to_string()))
    }

    /// Parses and signature-checks a token, returning its claims
    ///
    /// # Errors
    ///
    /// `JwtError::Expired` if past the expiry instant,
    /// `JwtError::Invalid` for a bad signature, structure, or issuer.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // no clock-skew allowance: expiry is the exact instant
        validation.leeway = 0;

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })?;

        Ok(data.claims)
    }

    /// Validates a token and requires it to be an access token
    pub fn validate_access(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate(token)?;
        if claims.token_type != TokenType::Access {
            return Err(JwtError::WrongTokenType { expected: "access" });
        }
        Ok(claims)
    }

    /// Validates a token and requires it to be a refresh token
    pub fn validate_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(JwtError::WrongTokenType { expected: "refresh" });
        }
        Ok(claims)
    }

    /// Exchanges a valid refresh token for a new access token
    pub fn refresh_access(&self, refresh_token: &str) -> Result<String, JwtError> {
        let refresh_claims = self.validate_refresh(refresh_token)?;

        let access_claims = Claims::new(
            &refresh_claims.username,
            refresh_claims.user_type,
            refresh_claims.sub,
            TokenType::Access,
        );
        self.create_token(&access_claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn service() -> TokenService {
        TokenService::new(SECRET)
    }

    #[test]
    fn test_token_lifetimes() {
        assert_eq!(TokenType::Access.lifetime(), Duration::hours(24));
        assert_eq!(TokenType::Refresh.lifetime(), Duration::hours(200));
    }

    #[test]
    fn test_issue_and_validate_session() {
        let user_id = Uuid::new_v4();
        let session = service()
            .issue_session("alice", UserType::Admin, user_id)
            .expect("should issue session");

        let claims = service()
            .validate_access(&session.access_token)
            .expect("access token should validate");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.user_type, UserType::Admin);
        assert_eq!(claims.iss, "taskforge");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_token_carries_identity() {
        let user_id = Uuid::new_v4();
        let session = service()
            .issue_session("alice", UserType::User, user_id)
            .expect("should issue session");

        let claims = service()
            .validate_refresh(&session.refresh_token)
            .expect("refresh token should validate");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let session = service()
            .issue_session("alice", UserType::Admin, Uuid::new_v4())
            .expect("should issue session");

        let other = TokenService::new("a-different-secret-also-32-bytes-long!");
        let result = other.validate(&session.access_token);
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_lifetime(
            "alice",
            UserType::Admin,
            Uuid::new_v4(),
            TokenType::Access,
            Duration::seconds(-3600),
        );
        assert!(claims.is_expired());

        let token = service().create_token(&claims).expect("should sign");
        let result = service().validate(&token);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_expiry_has_no_leeway() {
        // expired by seconds, not minutes; a skew allowance would still
        // accept this token
        let claims = Claims::with_lifetime(
            "alice",
            UserType::Admin,
            Uuid::new_v4(),
            TokenType::Access,
            Duration::seconds(-5),
        );

        let token = service().create_token(&claims).expect("should sign");
        assert!(matches!(service().validate(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_garbage_token() {
        assert!(matches!(
            service().validate("not.a.token"),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_access_and_refresh_are_not_interchangeable() {
        let session = service()
            .issue_session("alice", UserType::Admin, Uuid::new_v4())
            .expect("should issue session");

        assert!(matches!(
            service().validate_access(&session.refresh_token),
            Err(JwtError::WrongTokenType { expected: "access" })
        ));
        assert!(matches!(
            service().validate_refresh(&session.access_token),
            Err(JwtError::WrongTokenType { expected: "refresh" })
        ));
    }

    #[test]
    fn test_refresh_access() {
        let user_id = Uuid::new_v4();
        let session = service()
            .issue_session("alice", UserType::User, user_id)
            .expect("should issue session");

        let new_access = service()
            .refresh_access(&session.refresh_token)
            .expect("refresh should succeed");
        let claims = service()
            .validate_access(&new_access)
            .expect("new access token should validate");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.user_type, UserType::User);
    }

    #[test]
    fn test_refresh_with_access_token_fails() {
        let session = service()
            .issue_session("alice", UserType::User, Uuid::new_v4())
            .expect("should issue session");

        assert!(service().refresh_access(&session.access_token).is_err());
    }
}
