
use jobs_api::entities::token::AuthResponse;
use reqwest::{header::RETRY_AFTER, StatusCode};
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn register_returns_the_user_and_a_token() {
    let app = TestApp::spawn().await;

    let response = app.register("Ada Lovelace", "ada@example.com").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let auth: AuthResponse = response.json().await.unwrap();
    assert_eq!(auth.user.name, "Ada Lovelace");
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.token.is_empty());
}

#[actix_rt::test]
async fn duplicate_email_names_the_field() {
    let app = TestApp::spawn().await;
    app.register("Ada Lovelace", "ada@example.com").await;

    let response = app.register("Someone Else", "ADA@example.com").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 400);
    assert_eq!(
        body["msg"],
        "Duplicate value entered for email field, please choose another value"
    );
}

#[actix_rt::test]
async fn register_rejects_weak_passwords() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .json(&json!({ "name": "Ada Lovelace", "email": "ada@example.com", "password": "short" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Password must be at least 8 characters");
}

#[actix_rt::test]
async fn login_issues_a_token_that_opens_the_jobs_routes() {
    let app = TestApp::spawn().await;
    app.register("Ada Lovelace", "ada@example.com").await;

    let response = app
        .client
        .post(app.url("/api/v1/auth/login"))
        .json(&json!({ "email": "ada@example.com", "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let auth: AuthResponse = response.json().await.unwrap();
    let jobs = app.get("/api/v1/jobs", &auth.token).await;
    assert_eq!(jobs.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    app.register("Ada Lovelace", "ada@example.com").await;

    let response = app
        .client
        .post(app.url("/api/v1/auth/login"))
        .json(&json!({ "email": "ada@example.com", "password": "Wrong-Password-11!" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["msg"], "Invalid credentials");
}

#[actix_rt::test]
async fn unknown_routes_are_normalized_404s() {
    let app = TestApp::spawn().await;

    for path in ["/nope", "/api/v1/nope"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "statusCode": 404, "msg": "Route does not exist" }));
    }
}

#[actix_rt::test]
async fn health_and_home_are_public() {
    let app = TestApp::spawn().await;

    let health = app.client.get(app.url("/api/v1/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let body: Value = health.json().await.unwrap();
    assert_eq!(body["database"], "OK");

    let home = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(home.status(), StatusCode::OK);
    assert_eq!(home.headers()["x-content-type-options"], "nosniff");
}

#[actix_rt::test]
async fn clients_over_the_limit_get_429_with_retry_after() {
    let app = TestApp::spawn_with_rate_limit(3).await;

    for _ in 0..3 {
        let response = app.client.get(app.url("/")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .client
        .get(app.url("/"))
        .header("Origin", "https://jobs.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(RETRY_AFTER));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");

    let exposed = response
        .headers()
        .get("access-control-expose-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_lowercase();
    assert!(exposed.contains("retry-after"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 429);
}
