//! HTTP-level tests: the full router over an in-memory store.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use social_media_api::{
    app, Account, AccountStore, AppError, AppState, MemoryStore, Message, MessageStore,
};
use std::sync::Arc;
use tower::ServiceExt;

const BODY_LIMIT: usize = 64 * 1024;

fn router() -> Router {
    app(AppState::new(Arc::new(MemoryStore::new())), BODY_LIMIT)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    send_with_headers(app, method, uri, body, &[]).await
}

async fn send_with_headers(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("body is JSON")
}

async fn register(app: &Router, username: &str, password: &str) -> Account {
    let (status, body) = send(
        app,
        Method::POST,
        "/register",
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

async fn post_message(app: &Router, posted_by: i32, text: &str) -> Message {
    let (status, body) = send(
        app,
        Method::POST,
        "/messages",
        Some(json!({ "posted_by": posted_by, "message_text": text, "time_posted_epoch": 1000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn end_to_end_scenario() {
    let app = router();

    let alice = register(&app, "alice", "pw1234").await;
    assert_eq!(alice.username, "alice");

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "username": "alice", "password": "pw1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let logged_in: Account = serde_json::from_slice(&body).unwrap();
    assert_eq!(logged_in, alice);

    let message = post_message(&app, alice.account_id, "hello").await;
    assert_eq!(message.posted_by, alice.account_id);
    assert_eq!(message.message_text, "hello");
    assert_eq!(message.time_posted_epoch, 1000);

    let uri = format!("/messages/{}", message.message_id);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Message>(&body).unwrap(), message);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Message>(&body).unwrap(), message);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn register_rejections() {
    let app = router();
    let (status, body) = send(
        &app,
        Method::POST,
        "/register",
        Some(json!({ "username": "", "password": "pw1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    let (status, body) = send(
        &app,
        Method::POST,
        "/register",
        Some(json!({ "username": "bob", "password": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    register(&app, "bob", "pw1234").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/register",
        Some(json!({ "username": "bob", "password": "another" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_outcomes() {
    let app = router();
    register(&app, "carol", "secret").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "username": "carol", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "username": "nobody", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());

    let (status, _) = send(&app, Method::POST, "/login", Some(json!({ "username": "carol" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "username": "carol", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn whitespace_password_can_log_in() {
    let app = router();
    let spaced = register(&app, "spaced", "    ").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "username": "spaced", "password": "    " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Account>(&body).unwrap(), spaced);
}

#[tokio::test]
async fn create_message_rejections() {
    let app = router();
    let dave = register(&app, "dave", "pw1234").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/messages",
        Some(json!({ "posted_by": dave.account_id + 100, "message_text": "hi", "time_posted_epoch": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    let (status, body) = send(
        &app,
        Method::POST,
        "/messages",
        Some(json!({ "posted_by": dave.account_id, "message_text": " ", "time_posted_epoch": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    let (status, _) = send(
        &app,
        Method::POST,
        "/messages",
        Some(json!({ "posted_by": dave.account_id, "message_text": "x".repeat(256), "time_posted_epoch": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let exact = post_message(&app, dave.account_id, &"x".repeat(255)).await;
    assert_eq!(exact.message_text.chars().count(), 255);
}

#[tokio::test]
async fn acting_account_header_must_match_poster() {
    let app = router();
    let erin = register(&app, "erin", "pw1234").await;
    let other = (erin.account_id + 1).to_string();
    let (status, _) = send_with_headers(
        &app,
        Method::POST,
        "/messages",
        Some(json!({ "posted_by": erin.account_id, "message_text": "hi", "time_posted_epoch": 1 })),
        &[("X-Account-Id", other.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let own = erin.account_id.to_string();
    let (status, _) = send_with_headers(
        &app,
        Method::POST,
        "/messages",
        Some(json!({ "posted_by": erin.account_id, "message_text": "hi", "time_posted_epoch": 1 })),
        &[("X-Account-Id", own.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_unknown_message_is_success() {
    let app = router();
    for _ in 0..2 {
        let (status, body) = send(&app, Method::DELETE, "/messages/12345", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn non_integer_id_is_bad_request() {
    let app = router();
    for method in [Method::GET, Method::DELETE] {
        let (status, _) = send(&app, method, "/messages/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    let (status, _) = send(
        &app,
        Method::PATCH,
        "/messages/abc",
        Some(json!({ "message_text": "new" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_message_text() {
    let app = router();
    let frank = register(&app, "frank", "pw1234").await;
    let original = post_message(&app, frank.account_id, "first").await;
    let uri = format!("/messages/{}", original.message_id);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "message_text": "second" }))).await;
    assert_eq!(status, StatusCode::OK);
    let updated: Message = serde_json::from_slice(&body).unwrap();
    assert_eq!(updated.message_text, "second");
    assert_eq!(updated.message_id, original.message_id);
    assert_eq!(updated.posted_by, original.posted_by);
    assert_eq!(updated.time_posted_epoch, original.time_posted_epoch);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "message_text": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/messages/9999",
        Some(json!({ "message_text": "valid" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_messages_and_by_account() {
    let app = router();
    let gina = register(&app, "gina", "pw1234").await;
    let hank = register(&app, "hank", "pw1234").await;

    let (status, body) = send(&app, Method::GET, &format!("/accounts/{}/messages", hank.account_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));

    post_message(&app, gina.account_id, "one").await;
    post_message(&app, gina.account_id, "two").await;
    post_message(&app, hank.account_id, "three").await;

    let (status, body) = send(&app, Method::GET, "/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Vec<Message>>(&body).unwrap().len(), 3);

    let (_, body) = send(&app, Method::GET, &format!("/accounts/{}/messages", gina.account_id), None).await;
    let ginas: Vec<Message> = serde_json::from_slice(&body).unwrap();
    assert_eq!(ginas.len(), 2);
    assert!(ginas.iter().all(|m| m.posted_by == gina.account_id));
}

#[tokio::test]
async fn health_and_ready() {
    let app = router();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["status"], "up");
    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["storage"], "up");
    assert!(body["storage_ms"].is_u64());
    let (status, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["name"], "social-media-api");
}

/// Backend whose every call fails the way an unreachable database would.
struct BrokenStore;

fn unavailable<T>() -> Result<T, AppError> {
    Err(AppError::Db(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl AccountStore for BrokenStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        unavailable()
    }
    async fn insert_account(&self, _: &str, _: &str) -> Result<Option<Account>, AppError> {
        unavailable()
    }
    async fn account_by_id(&self, _: i32) -> Result<Option<Account>, AppError> {
        unavailable()
    }
    async fn account_by_username(&self, _: &str) -> Result<Option<Account>, AppError> {
        unavailable()
    }
    async fn ping(&self) -> Result<(), AppError> {
        unavailable()
    }
}

#[async_trait]
impl MessageStore for BrokenStore {
    async fn insert_message(&self, _: i32, _: &str, _: i64) -> Result<Option<Message>, AppError> {
        unavailable()
    }
    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        unavailable()
    }
    async fn message_by_id(&self, _: i32) -> Result<Option<Message>, AppError> {
        unavailable()
    }
    async fn delete_message(&self, _: i32) -> Result<Option<Message>, AppError> {
        unavailable()
    }
    async fn replace_message_text(&self, _: i32, _: &str) -> Result<Option<Message>, AppError> {
        unavailable()
    }
    async fn list_messages_by_account(&self, _: i32) -> Result<Vec<Message>, AppError> {
        unavailable()
    }
}

#[tokio::test]
async fn storage_failure_is_500_without_detail() {
    let app = app(AppState::new(Arc::new(BrokenStore)), BODY_LIMIT);

    let (status, body) = send(
        &app,
        Method::POST,
        "/register",
        Some(json!({ "username": "ivy", "password": "pw1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(&body);
    assert_eq!(body["error"]["code"], "database_error");
    assert_eq!(body["error"]["message"], "internal storage error");

    let (status, _) = send(&app, Method::GET, "/messages", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(&body);
    assert_eq!(body["status"], "down");
    assert_eq!(body["storage"], "down");
}
