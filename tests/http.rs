use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use room_chat::{
    api::{create_router, AppState},
    config::Config,
    db,
};

async fn app() -> Router {
    let pool = db::connect_in_memory().await.unwrap();
    let config = Config::from_lookup(|key| match key {
        "SECRET" => Some("integration-secret".to_string()),
        _ => None,
    })
    .unwrap();
    create_router(AppState::new(pool, Arc::new(config)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn signup_and_login(app: &Router, username: &str, password: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn signup_hides_password_hash() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "username": "alice123", "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice123");
    assert_eq!(body["rooms"], json!([]));
    assert!(body.get("password_hash").is_none());
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn signup_validation_and_duplicates() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "username": "short", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    signup_and_login(&app, "alice123", "pw").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "username": "alice123", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicate_username");
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let app = app().await;
    signup_and_login(&app, "alice123", "pw").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "alice123", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn auth_failures_are_uniform() {
    let app = app().await;

    let (missing_status, missing) = send(&app, Method::GET, "/rooms", None, None).await;
    let (bad_status, bad) = send(&app, Method::GET, "/rooms", Some("garbage"), None).await;

    assert_eq!(missing_status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad_status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing, bad);
    assert_eq!(missing["error"], "unauthorized");
}

#[tokio::test]
async fn room_lifecycle() {
    let app = app().await;
    let alice = signup_and_login(&app, "alice123", "pw").await;
    let bob = signup_and_login(&app, "bobbob1", "pw").await;

    let (status, room) = send(
        &app,
        Method::POST,
        "/rooms",
        Some(&alice),
        Some(json!({ "roomName": "general", "roomPass": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room["creator"], "alice123");
    assert_eq!(room["members"], json!(["alice123"]));
    assert!(room.get("password_hash").is_none());
    let id = room["id"].as_str().unwrap().to_string();

    // outsiders see nothing
    let (status, body) = send(&app, Method::GET, &format!("/rooms/{}", id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_member");

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/rooms/join/{}", id),
        Some(&bob),
        Some(json!({ "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/rooms/join/not-an-id",
        Some(&bob),
        Some(json!({ "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/rooms/join/{}", id),
        Some(&bob),
        Some(json!({ "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, room) = send(
        &app,
        Method::POST,
        &format!("/rooms/{}/message", id),
        Some(&bob),
        Some(json!({ "content": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room["messages"][0]["content"], "hi");
    assert_eq!(room["messages"][0]["author"], "bobbob1");

    let (status, body) = send(&app, Method::DELETE, &format!("/rooms/{}", id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "not_creator");

    let (status, _) = send(&app, Method::PATCH, &format!("/rooms/leave/{}", id), Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PATCH, &format!("/rooms/leave/{}", id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/users/me", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rooms"], json!([]));

    let (status, _) = send(&app, Method::DELETE, &format!("/rooms/{}", id), Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, rooms) = send(&app, Method::GET, "/rooms", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms, json!([]));
}

#[tokio::test]
async fn message_to_foreign_room_is_404_and_not_stored() {
    let app = app().await;
    let alice = signup_and_login(&app, "alice123", "pw").await;
    let bob = signup_and_login(&app, "bobbob1", "pw").await;

    let (_, room) = send(
        &app,
        Method::POST,
        "/rooms",
        Some(&alice),
        Some(json!({ "roomName": "general", "roomPass": "secret" })),
    )
    .await;
    let id = room["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/rooms/{}/message", id),
        Some(&bob),
        Some(json!({ "content": "sneaky" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (_, room) = send(&app, Method::GET, &format!("/rooms/{}", id), Some(&alice), None).await;
    assert_eq!(room["messages"], json!([]));

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/rooms/{}/message", id),
        Some(&alice),
        Some(json!({ "content": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let app = app().await;

    let broken = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let no_content_type = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .body(Body::from(json!({ "username": "alice123", "password": "pw" }).to_string()))
        .unwrap();

    for request in [broken, no_content_type] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn join_unknown_room_is_400() {
    let app = app().await;
    let bob = signup_and_login(&app, "bobbob1", "pw").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/rooms/join/7f1c2d3e-4b5a-4c6d-8e9f-0a1b2c3d4e5f",
        Some(&bob),
        Some(json!({ "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_room_id");
}
