use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use prboard::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.jwt_secret = "test-secret".to_string();
    config.server.secure_cookies = false;

    let state = prboard::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    prboard::api::router(state).await
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Sign up a user, asserting success, and return the session cookie pair.
async fn signup(app: &Router, email: &str, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth",
            None,
            json!({"action": "signup", "email": email, "password": "secret1", "name": name}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("signup must set the session cookie")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("auth-token="));
    assert!(cookie.contains("HttpOnly"));

    cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn signup_never_returns_password_material() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth",
            None,
            json!({"action": "signup", "email": "a@x.com", "password": "secret1", "name": "A"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["email"], json!("a@x.com"));
    let user_text = body["data"]["user"].to_string();
    assert!(!user_text.contains("password"));
    assert!(!user_text.contains("secret1"));
}

#[tokio::test]
async fn duplicate_signup_conflicts_and_bad_login_is_unauthorized() {
    let app = spawn_app().await;
    signup(&app, "a@x.com", "A").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth",
            None,
            json!({"action": "signup", "email": "A@X.COM", "password": "another1", "name": "B"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth",
            None,
            json!({"action": "login", "email": "a@x.com", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth",
            None,
            json!({"action": "login", "email": "a@x.com", "password": "secret1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_valid_session() {
    let app = spawn_app().await;

    for uri in ["/api/auth", "/api/prs", "/api/workspaces"] {
        let response = app
            .clone()
            .oneshot(get_request(uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/prs", Some("auth-token=garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn pr_lifecycle_signup_create_move_list() {
    let app = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "A").await;

    // Create: status starts at initial regardless of anything else.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/prs",
            Some(&cookie),
            json!({
                "title": "Fix bug",
                "category": "project",
                "project": "Core",
                "author": "A",
                "priority": "high"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let id = body["data"]["pr"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["pr"]["status"], json!("initial"));
    assert_eq!(body["data"]["pr"]["priority"], json!("high"));

    // Move to approved.
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/prs",
            Some(&cookie),
            json!({"id": id, "status": "approved"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["pr"]["status"], json!("approved"));

    // Listing shows exactly the one approved record, fields intact.
    let response = app
        .clone()
        .oneshot(get_request("/api/prs", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let prs = body["data"]["prs"].as_array().unwrap();
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0]["title"], json!("Fix bug"));
    assert_eq!(prs[0]["status"], json!("approved"));
    assert_eq!(prs[0]["project"], json!("Core"));
}

#[tokio::test]
async fn create_validation_rejects_missing_workspace_field() {
    let app = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "A").await;

    // A project PR without a project name is a 400.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/prs",
            Some(&cookie),
            json!({"title": "Fix bug", "category": "project", "author": "A"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown fields in the payload are rejected outright.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/prs",
            Some(&cookie),
            json!({
                "title": "Fix bug",
                "category": "project",
                "project": "Core",
                "author": "A",
                "bogus_field": 1
            }),
        ))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn owner_scoping_hides_other_users_records() {
    let app = spawn_app().await;
    let cookie_a = signup(&app, "a@x.com", "A").await;
    let cookie_b = signup(&app, "b@x.com", "B").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/prs",
            Some(&cookie_a),
            json!({"title": "A's PR", "category": "project", "project": "Core", "author": "A"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let id = body["data"]["pr"]["id"].as_i64().unwrap();

    // B cannot see it.
    let response = app
        .clone()
        .oneshot(get_request("/api/prs", Some(&cookie_b)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["data"]["prs"].as_array().unwrap().is_empty());

    // B's update and delete look exactly like a missing record.
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/prs",
            Some(&cookie_b),
            json!({"id": id, "status": "merged"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/prs?id={id}"))
                .header(header::COOKIE, &cookie_b)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A still sees the record untouched.
    let response = app
        .clone()
        .oneshot(get_request("/api/prs", Some(&cookie_a)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["prs"][0]["status"], json!("initial"));
}

#[tokio::test]
async fn delete_pr_requires_id_and_returns_no_content() {
    let app = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "A").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/prs")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/prs",
            Some(&cookie),
            json!({"title": "Temp", "category": "service", "service": "Billing", "author": "A"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let id = body["data"]["pr"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/prs?id={id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn preferences_patch_merges_fields() {
    let app = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "A").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/auth",
            Some(&cookie),
            json!({"theme": "dark"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["user"]["preferences"]["theme"], json!("dark"));
    // Untouched preference keeps its default.
    assert_eq!(
        body["data"]["user"]["preferences"]["email_notifications"],
        json!(true)
    );

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/auth",
            Some(&cookie),
            json!({"theme": "neon"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let app = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "A").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/auth")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("auth-token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn listings_reflect_writes_even_when_cached() {
    let app = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "A").await;

    // Warm the cache with an empty listing.
    let response = app
        .clone()
        .oneshot(get_request("/api/prs", Some(&cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["prs"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/prs",
            Some(&cookie),
            json!({"title": "Fix bug", "category": "project", "project": "Core", "author": "A"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["pr"]["id"].as_i64().unwrap();

    // The create must show up on the very next read, cache or not.
    let response = app
        .clone()
        .oneshot(get_request("/api/prs", Some(&cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["prs"].as_array().unwrap().len(), 1);

    // Same for an update behind the now-warm cache.
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/prs",
            Some(&cookie),
            json!({"id": id, "status": "merged"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/api/prs", Some(&cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["prs"][0]["status"], json!("merged"));

    // And for a delete.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/prs?id={id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request("/api/prs", Some(&cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["prs"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn links_and_scheduling_fields_survive_a_round_trip() {
    let app = spawn_app().await;
    let cookie = signup(&app, "a@x.com", "A").await;

    let payload = json!({
        "title": "Release notes",
        "category": "service",
        "service": "Billing",
        "author": "A",
        "links": [
            {"url": "https://github.com/acme/billing/pull/42", "label": "PR"},
            {"url": "https://ci.example.com/run/7"}
        ],
        "scheduled_date": "2026-09-01",
        "scheduled_time": "14:30",
        "email_reminder": true,
        "calendar_event": true
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/prs", Some(&cookie), payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"]["pr"].clone();

    let response = app
        .clone()
        .oneshot(get_request("/api/prs", Some(&cookie)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let listed = &body["data"]["prs"][0];

    for field in [
        "links",
        "scheduled_date",
        "scheduled_time",
        "email_reminder",
        "calendar_event",
    ] {
        assert_eq!(created[field], listed[field], "{field} changed between create and list");
        assert_eq!(payload[field], listed[field], "{field} differs from the submitted value");
    }
}
