use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use prboard::api::AppState;
use prboard::config::Config;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.jwt_secret = "test-secret".to_string();
    config.server.secure_cookies = false;
    config.server.public_url = "https://board.example.com".to_string();

    let state = prboard::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    let app = prboard::api::router(state.clone()).await;
    (app, state)
}

async fn signup(app: &Router, email: &str, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({"action": "signup", "email": email, "password": "secret1", "name": name})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn create_share(app: &Router, cookie: &str) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/share")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, cookie)
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn resolve(app: &Router, token: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/share?token={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn share_link_resolves_without_a_session_and_counts_accesses() {
    let (app, _state) = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "Alice").await;

    // Give the shared board one card.
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/prs")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &cookie)
                .body(Body::from(
                    json!({"title": "Fix bug", "category": "project", "project": "Core", "author": "Alice"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let share = create_share(&app, &cookie).await;
    let token = share["data"]["token"].as_str().unwrap().to_string();
    let url = share["data"]["shareUrl"].as_str().unwrap();
    assert!(url.starts_with("https://board.example.com/shared?token="));
    assert!(share["data"]["expiresAt"].is_string());
    assert_eq!(token.len(), 64);

    // First resolution, no cookie attached.
    let response = resolve(&app, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], json!("Alice's PR Board"));
    assert_eq!(body["data"]["createdBy"], json!("Alice"));
    assert_eq!(body["data"]["accessCount"], json!(1));
    assert_eq!(body["data"]["prs"].as_array().unwrap().len(), 1);

    // Second resolution bumps the counter by exactly one.
    let response = resolve(&app, &token).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["accessCount"], json!(2));
}

#[tokio::test]
async fn invalid_and_missing_tokens_are_indistinguishable() {
    let (app, _state) = spawn_app().await;

    // Missing token is a validation error.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/share")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A token that never existed is a generic 404.
    let response = resolve(&app, &"0".repeat(64)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn expired_and_deactivated_links_look_like_missing_ones() {
    let (app, state) = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "Alice").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let user_id =
        i32::try_from(body_json(response).await["data"]["user"]["id"].as_i64().unwrap()).unwrap();

    // A link whose window has already closed.
    let expired = "e".repeat(64);
    state
        .store()
        .create_share_link(&expired, user_id, "Alice's PR Board", -1)
        .await
        .unwrap();

    // A link revoked by flag mutation.
    let deactivated = "d".repeat(64);
    state
        .store()
        .create_share_link(&deactivated, user_id, "Alice's PR Board", 7)
        .await
        .unwrap();
    state.store().deactivate_share_link(&deactivated).await.unwrap();

    let response = resolve(&app, &"0".repeat(64)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let missing_body = body_json(response).await;

    // Both must be byte-identical to a token that never existed.
    for token in [expired, deactivated] {
        let response = resolve(&app, &token).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, missing_body);
    }
}

#[tokio::test]
async fn creating_a_share_requires_a_session() {
    let (app, _state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/share")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn custom_titles_and_distinct_tokens() {
    let (app, _state) = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "Alice").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/share")
                .header("Content-Type", "application/json")
                .header(header::COOKIE, &cookie)
                .body(Body::from(json!({"title": "Sprint review"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;

    let second = create_share(&app, &cookie).await;

    assert_ne!(first["data"]["token"], second["data"]["token"]);

    let response = resolve(&app, first["data"]["token"].as_str().unwrap()).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], json!("Sprint review"));
}
