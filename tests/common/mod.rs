#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use profile_auth::{
    app::build_app,
    config::{AppConfig, PasswordConfig},
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = TEST_SECRET.into();
    config.password = PasswordConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    config
}

/// Router backed by its own in-memory database.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let state = AppState::in_memory(config).await.expect("test state");
        let router = build_app(state.clone());
        Self { state, router }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn get_with_auth_header(&self, uri: &str, value: &str) -> (StatusCode, Value) {
        self.send(
            Request::get(uri)
                .header(header::AUTHORIZATION, value)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn get_auth(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.get_with_auth_header(uri, &format!("Bearer {token}")).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, &body.to_string()).await
    }

    pub async fn signup(&self, email: &str, password: &str, name: &str) -> (StatusCode, Value) {
        self.post_json(
            "/api/auth/signup",
            &serde_json::json!({ "email": email, "password": password, "name": name }),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post_json(
            "/api/auth/login",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn user_count(&self) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.state.db)
            .await
            .expect("count users");
        count
    }
}
