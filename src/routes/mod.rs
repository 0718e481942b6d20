use std::any::Any;

use axum::{
    Extension, Json, Router,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{response::ApiResponse, routes::doc::scalar_docs, state::AppState};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod doc;
pub mod health;
pub mod params;
pub mod restaurants;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/restaurants", restaurants::router())
        .nest("/cart", cart::router())
}

/// The full application: process-level routes, the API, docs and the error fallbacks.
/// Transport concerns (tracing, request ids, limits) are layered on in `main`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(scalar_docs())
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(Extension(state.jwt.clone()))
        .with_state(state)
}

async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<ApiResponse<()>>) {
    let body = ApiResponse::failure(
        format!("Cannot {} {}", method, uri.path()),
        Some("Route not found".to_string()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}

pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!(error = %detail, "handler panicked");

    let body = ApiResponse::failure("Something went wrong!", Some(detail));
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn panic_handler_reports_message() {
        let response = handle_panic(Box::new("kitchen on fire"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["message"], "Something went wrong!");
        assert_eq!(body["error"], "kitchen on fire");
    }

    #[tokio::test]
    async fn panicking_route_becomes_json_500() {
        async fn explode() -> &'static str {
            panic!("order {} exploded", 42)
        }

        let app = Router::new()
            .route("/explode", get(explode))
            .layer(CatchPanicLayer::custom(handle_panic));
        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["message"], "Something went wrong!");
        assert_eq!(body["error"], "order 42 exploded");
    }
}
