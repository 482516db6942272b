mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn signup_returns_token_for_new_user() {
    let app = TestApp::new().await;

    let (status, body) = app.signup("a@b.com", "pw", "Ana").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let token = body["token"].as_str().expect("token");
    let user_id = app.state.keys.verify(token).expect("token verifies");
    assert!(!user_id.is_empty());
    assert_eq!(app.user_count().await, 1);
}

#[tokio::test]
async fn login_after_signup_yields_same_identity() {
    let app = TestApp::new().await;
    let (_, signup) = app.signup("ana@example.com", "hunter2", "Ana").await;
    let signup_user = app
        .state
        .keys
        .verify(signup["token"].as_str().unwrap())
        .unwrap();

    let (status, body) = app.login("ana@example.com", "hunter2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let login_user = app
        .state
        .keys
        .verify(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(login_user, signup_user);
}

#[tokio::test]
async fn duplicate_signup_is_rejected_without_new_row() {
    let app = TestApp::new().await;
    let (status, _) = app.signup("a@b.com", "pw", "Ana").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.signup("a@b.com", "other", "Someone").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Email already exists" }));
    assert_eq!(app.user_count().await, 1);
}

#[tokio::test]
async fn email_is_case_sensitive() {
    let app = TestApp::new().await;
    app.signup("Ana@b.com", "pw", "Ana").await;

    let (status, _) = app.signup("ana@b.com", "pw", "Ana 2").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.login("ANA@B.COM", "pw").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_failures_share_a_generic_message() {
    let app = TestApp::new().await;
    app.signup("a@b.com", "pw", "Ana").await;

    let (status, wrong_password) = app.login("a@b.com", "nope").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = app.login("ghost@b.com", "pw").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(unknown_user["error"], "Invalid credentials");
}

#[tokio::test]
async fn signup_validates_input() {
    let app = TestApp::new().await;

    let (status, body) = app.signup("not-an-email", "pw", "Ana").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email");

    let (status, body) = app.signup("a@b.com", "", "Ana").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password is required");

    assert_eq!(app.user_count().await, 0);
}

#[tokio::test]
async fn malformed_bodies_get_the_error_envelope() {
    let app = TestApp::new().await;

    let (status, body) = app.post_raw("/api/auth/signup", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let (status, body) = app
        .post_json("/api/auth/login", &json!({ "email": "a@b.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn seed_is_idempotent_and_login_works() {
    let app = TestApp::new().await;

    for _ in 0..2 {
        let (status, body) = app.get("/api/seed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "message": "Seed done!" }));
    }
    assert_eq!(app.user_count().await, 1);

    let (status, body) = app.login("jay@test.com", "password123").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get_auth("/api/profile", body["token"].as_str().unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["name"], "阿傑");
}
