/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes.
///
/// # Example
///
/// ```no_run
/// use taskforge_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskforge_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::config::Config;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskforge_shared::{
    auth::jwt::TokenService,
    store::{IdentityStore, PgIdentityStore, PgTaskStore, TaskStore},
    usecase::{TaskUsecase, UserUsecase},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// User operations behind the identity store
    pub users: UserUsecase,

    /// Task operations behind the task store
    pub tasks: TaskUsecase,

    /// Token issuance and validation
    pub tokens: TokenService,

    /// Database connection pool, absent when running on in-memory stores
    pub db: Option<PgPool>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state backed by Postgres stores
    pub fn new(db: PgPool, config: Config) -> Self {
        let timeout = config.store_timeout();
        Self {
            users: UserUsecase::new(Arc::new(PgIdentityStore::new(db.clone())), timeout),
            tasks: TaskUsecase::new(Arc::new(PgTaskStore::new(db.clone())), timeout),
            tokens: TokenService::new(&config.jwt.secret),
            db: Some(db),
            config: Arc::new(config),
        }
    }

    /// Creates application state over caller-provided stores
    ///
    /// Used by tests to run the full router against in-memory stores.
    pub fn with_stores(
        identities: Arc<dyn IdentityStore>,
        tasks: Arc<dyn TaskStore>,
        config: Config,
    ) -> Self {
        let timeout = config.store_timeout();
        Self {
            users: UserUsecase::new(identities, timeout),
            tasks: TaskUsecase::new(tasks, timeout),
            tokens: TokenService::new(&config.jwt.secret),
            db: None,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /api/
///     ├── /users/
///     │   ├── POST /register        # Create account (public)
///     │   ├── POST /login           # Password login (public)
///     │   ├── POST /refresh         # Rotate access token (public)
///     │   ├── GET    /              # List users (authenticated)
///     │   ├── GET    /:user_id      # Fetch user (authenticated)
///     │   ├── PUT    /:user_id      # Update profile (self or admin)
///     │   └── DELETE /:user_id      # Delete account (self or admin)
///     └── /tasks/
///         ├── GET    /              # List tasks (public)
///         ├── GET    /:task_id      # Fetch task (public)
///         ├── POST   /              # Create task (authenticated)
///         ├── PUT    /:task_id      # Update task (owner only)
///         └── DELETE /:task_id      # Delete task (owner only)
/// ```
///
/// Authentication is enforced per handler through the
/// [`AuthContext`](crate::middleware::auth::AuthContext) extractor, so
/// public and protected methods can share a path.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route("/register", post(routes::users::register))
        .route("/login", post(routes::users::login))
        .route("/refresh", post(routes::users::refresh))
        .route("/", get(routes::users::list_users))
        .route(
            "/:user_id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let api_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/tasks", task_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
