/// Task endpoints
///
/// Reads are public. Creation requires authentication, and the task's
/// owner is always the authenticated caller; update and delete are
/// refused by the store for anyone but the creator.
///
/// # Endpoints
///
/// - `GET /api/tasks` - List all tasks (public)
/// - `GET /api/tasks/:task_id` - Fetch a task (public)
/// - `POST /api/tasks` - Create a task (authenticated)
/// - `PUT /api/tasks/:task_id` - Update a task (owner only)
/// - `DELETE /api/tasks/:task_id` - Delete a task (owner only)
use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
    middleware::auth::AuthContext,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskforge_shared::models::{Task, TaskPatch};
use uuid::Uuid;
use validator::Validate;

/// Create task request
///
/// Carries no ownership fields; the owner comes from the caller's
/// validated token.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 4, max = 50, message = "Title must be 4-50 characters"))]
    pub title: String,

    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: String,

    pub start_date: Option<DateTime<Utc>>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Update task request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 4, max = 50, message = "Title must be 4-50 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 100, message = "Description must be at most 100 characters"))]
    pub description: Option<String>,

    pub status: Option<String>,

    pub start_date: Option<DateTime<Utc>>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Deletion acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Lists all tasks (public)
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.tasks.fetch_all().await?;
    Ok(Json(tasks))
}

/// Fetches a single task by business id (public)
///
/// # Errors
///
/// - `404 Not Found`: No such task
pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.fetch_by_id(task_id).await?;
    Ok(Json(task))
}

/// Creates a task owned by the authenticated caller
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `422 Unprocessable Entity`: Field validation failed
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_error)?;

    let task = Task::new(
        req.title,
        req.description,
        req.status,
        req.start_date,
        req.due_date,
        auth.user_id,
    );

    state.tasks.create(&task).await?;

    tracing::info!(task_id = %task.task_id, created_by = %auth.user_id, "task created");

    Ok(Json(task))
}

/// Updates a task
///
/// The store enforces ownership: a caller who is not the creator gets
/// a 403 even with a valid token, and creation fields never change.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: Caller did not create the task
/// - `404 Not Found`: No such task
/// - `422 Unprocessable Entity`: Field validation failed
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_error)?;

    let patch = TaskPatch {
        title: req.title,
        description: req.description,
        status: req.status,
        start_date: req.start_date,
        due_date: req.due_date,
    };

    let task = state
        .tasks
        .update_by_id(task_id, auth.user_id, &patch)
        .await?;
    Ok(Json(task))
}

/// Deletes a task
///
/// Same ownership gate as update.
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    state.tasks.delete_by_id(task_id, auth.user_id).await?;

    tracing::info!(task_id = %task_id, deleted_by = %auth.user_id, "task deleted");

    Ok(Json(DeleteResponse {
        message: "Successfully deleted task".to_string(),
    }))
}
