/// Shared test harness
///
/// Builds the full router over in-memory stores so tests exercise the
/// real HTTP surface (routing, extractors, error mapping) without a
/// database.
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use taskforge_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, JwtConfig},
};
use taskforge_shared::store::{InMemoryIdentityStore, InMemoryTaskStore};
use tower::ServiceExt;

pub struct TestContext {
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 5,
                store_timeout_seconds: 5,
            },
            jwt: JwtConfig {
                secret: "integration-test-secret-at-least-32-bytes!".to_string(),
            },
        };

        let state = AppState::with_stores(
            Arc::new(InMemoryIdentityStore::new()),
            Arc::new(InMemoryTaskStore::new()),
            config,
        );

        Self {
            app: build_router(state),
        }
    }

    /// Sends a request and returns the status plus the parsed JSON body
    /// (`Value::Null` when the body is empty or not JSON).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    /// Registers an account, panicking on anything but success
    pub async fn register(&self, username: &str, password: &str, user_type: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/users/register",
                None,
                Some(json!({
                    "username": username,
                    "first_name": "Testy",
                    "last_name": "McTestface",
                    "password": password,
                    "user_type": user_type,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body
    }

    /// Logs in and returns the access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = self.login_full(username, password).await;
        body["token"].as_str().unwrap().to_string()
    }

    /// Logs in and returns the whole response body
    pub async fn login_full(&self, username: &str, password: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/users/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body
    }

    /// Creates a task as the given caller and returns its body
    pub async fn create_task(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/tasks",
                Some(token),
                Some(json!({
                    "title": title,
                    "description": "created by the test harness",
                    "status": "open",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create task failed: {body}");
        body
    }
}
