/// User endpoints
///
/// Registration, login, and token refresh are public; account listing
/// and management require authentication. Update and delete apply only
/// to the caller's own account unless the caller is an administrator.
///
/// # Endpoints
///
/// - `POST /api/users/register` - Create an account
/// - `POST /api/users/login` - Password login, returns session tokens
/// - `POST /api/users/refresh` - Exchange a refresh token for an access token
/// - `GET /api/users` - List users (authenticated)
/// - `GET /api/users/:user_id` - Fetch a user (authenticated)
/// - `PUT /api/users/:user_id` - Update profile (self or admin)
/// - `DELETE /api/users/:user_id` - Delete account (self or admin)
use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
    middleware::auth::AuthContext,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use taskforge_shared::{
    auth::password,
    error::StoreError,
    models::{
        user::{validate_username, UserPatch},
        User, UserType,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username: letter first, then letters/digits/underscores
    #[validate(
        length(min = 5, max = 25, message = "Username must be 5-25 characters"),
        custom(function = validate_username)
    )]
    pub username: String,

    #[validate(length(min = 3, max = 50, message = "First name must be 3-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 3, max = 50, message = "Last name must be 3-50 characters"))]
    pub last_name: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Requested role; the first account ever created must be ADMIN
    pub user_type: UserType,
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,

    /// Business id of the new account
    pub user_id: Uuid,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,

    /// Access token (24h)
    pub token: String,

    /// Refresh token (200h)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50, message = "First name must be 3-50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 3, max = 50, message = "Last name must be 3-50 characters"))]
    pub last_name: Option<String>,
}

/// Deletion acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Register a new user
///
/// Hashes the password, generates the business id, issues the first
/// session token pair, and persists the account with those tokens.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Field validation failed
/// - `409 Conflict`: Username already taken
/// - `403 Forbidden`: First account requested a non-admin role
/// - `500 Internal Server Error`: Hashing or signing failure
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate().map_err(validation_error)?;

    let password_hash = password::hash_password(&req.password)?;
    let user_id = Uuid::new_v4();

    let session = state
        .tokens
        .issue_session(&req.username, req.user_type, user_id)?;

    let now = Utc::now();
    let user = User {
        user_id,
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        password_hash,
        user_type: req.user_type,
        token: Some(session.access_token),
        refresh_token: Some(session.refresh_token),
        created_at: now,
        updated_at: now,
    };

    state.users.create(&user).await?;

    tracing::info!(user_id = %user.user_id, username = %user.username, "user registered");

    Ok(Json(RegisterResponse {
        message: "Successfully created user".to_string(),
        user_id: user.user_id,
    }))
}

/// Login endpoint
///
/// Verifies credentials, issues a fresh token pair, and persists it on
/// the account. Both an unknown username and a wrong password produce
/// the same generic 401 message.
///
/// # Errors
///
/// - `401 Unauthorized`: Username or password is incorrect
/// - `500 Internal Server Error`: Hashing or signing failure
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = match state.users.get_by_username(&req.username).await {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            return Err(ApiError::Unauthorized(
                "Username or password is incorrect".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Username or password is incorrect".to_string(),
        ));
    }

    let session = state
        .tokens
        .issue_session(&user.username, user.user_type, user.user_id)?;

    state
        .users
        .update_session_tokens(user.user_id, &session.access_token, &session.refresh_token)
        .await?;

    Ok(Json(LoginResponse {
        user_id: user.user_id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        user_type: user.user_type,
        token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a valid refresh token for a new access token. The refresh
/// token carries the caller's identity, so no store lookup is needed.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or non-refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = state.tokens.refresh_access(&req.refresh_token)?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Lists all users (authenticated)
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.users.fetch_all().await?;
    Ok(Json(users))
}

/// Fetches a single user by business id (authenticated)
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = state.users.fetch_by_id(user_id).await?;
    Ok(Json(user))
}

/// Updates a user's profile
///
/// Callers may update their own account; administrators may update
/// anyone's.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the account owner nor an admin
/// - `404 Not Found`: No such user
/// - `422 Unprocessable Entity`: Field validation failed
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    if !auth.can_manage_user(user_id) {
        return Err(ApiError::Forbidden(
            "You may only update your own account".to_string(),
        ));
    }

    req.validate().map_err(validation_error)?;

    let patch = UserPatch {
        first_name: req.first_name,
        last_name: req.last_name,
    };

    let user = state.users.update_by_id(user_id, &patch).await?;
    Ok(Json(user))
}

/// Deletes a user account
///
/// Same authorization rule as update: self or admin.
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    if !auth.can_manage_user(user_id) {
        return Err(ApiError::Forbidden(
            "You may only delete your own account".to_string(),
        ));
    }

    state.users.delete_by_id(user_id).await?;

    tracing::info!(user_id = %user_id, deleted_by = %auth.user_id, "user deleted");

    Ok(Json(DeleteResponse {
        message: "Successfully deleted user".to_string(),
    }))
}
