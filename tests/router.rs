mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use food_delivery_api::{routes::create_app, services::auth_service::issue_token};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    create_app(common::offline_state())
}

fn token_for(role: &str) -> String {
    let state = common::offline_state();
    issue_token(&state.jwt, Uuid::new_v4(), role).expect("token")
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let (status, body) = send(get("/api/does-not-exist", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["message"], "Cannot GET /api/does-not-exist");
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn wrong_method_returns_json_404() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cannot DELETE /health");
}

#[tokio::test]
async fn health_and_root_are_public() {
    let (status, body) = send(get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "OK");
    assert!(body["data"]["timestamp"].is_string());

    let (status, body) = send(get("/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["endpoints"]["admin"], "/api/admin");
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let (status, body) = send(get("/api/admin/users", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["message"], "Missing Authorization header");
}

#[tokio::test]
async fn admin_routes_reject_garbage_tokens() {
    let (status, body) = send(get("/api/admin/users/stats", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn admin_routes_reject_other_roles() {
    let token = token_for("user");
    let (status, body) = send(get("/api/admin/users", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], Value::Bool(false));
}

#[tokio::test]
async fn cart_routes_reject_admins() {
    let token = token_for("admin");
    let uri = format!("/api/cart/{}", Uuid::new_v4());
    let (status, _) = send(get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_user_id_is_a_bad_request() {
    let token = token_for("admin");
    let (status, body) = send(get("/api/admin/users/not-a-uuid", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], Value::Bool(false));
}

#[tokio::test]
async fn short_block_reason_is_rejected_before_lookup() {
    let token = token_for("admin");
    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/admin/users/{}/block", Uuid::new_v4()))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"reason":"  123456789  "}"#))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Block reason must be at least 10 characters");
}

#[tokio::test]
async fn missing_block_reason_is_rejected() {
    let token = token_for("admin");
    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/admin/users/{}/block", Uuid::new_v4()))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Block reason must be at least 10 characters");
}

#[tokio::test]
async fn zero_quantity_add_is_rejected() {
    let token = token_for("user");
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/cart/{}/items", Uuid::new_v4()))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!(
            r#"{{"itemId":"{}","quantity":0}}"#,
            Uuid::new_v4()
        )))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Quantity must be at least 1");
}
