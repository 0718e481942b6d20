use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::users::{BlockUserRequest, UserList, UserListQuery},
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    middleware::auth::{ADMIN_ONLY, AuthUser, require_roles},
    models::{UserProfile, UserStats},
    response::ApiResponse,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/stats", get(user_stats))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/block", put(block_user))
        .route("/users/{id}/unblock", put(unblock_user))
        .route("/users/{id}/toggle-status", put(toggle_user_status))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("status" = Option<String>, Query, description = "Filter: active, blocked, inactive"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 10")
    ),
    responses(
        (status = 200, description = "Paginated users, newest first", body = ApiResponse<UserList>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/stats",
    responses(
        (status = 200, description = "User counts for the dashboard", body = ApiResponse<UserStats>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn user_stats(State(state): State<AppState>) -> AppResult<Json<ApiResponse<UserStats>>> {
    let resp = admin_service::user_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = ApiResponse<UserProfile>),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = admin_service::get_user(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/block",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = BlockUserRequest,
    responses(
        (status = 200, description = "User blocked", body = ApiResponse<UserProfile>),
        (status = 400, description = "Reason too short or user already blocked"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn block_user(
    State(state): State<AppState>,
    admin: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<BlockUserRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = admin_service::block_user(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/unblock",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User unblocked", body = ApiResponse<UserProfile>),
        (status = 400, description = "User is not blocked"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn unblock_user(
    State(state): State<AppState>,
    admin: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = admin_service::unblock_user(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/toggle-status",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Active flag flipped", body = ApiResponse<UserProfile>),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_user_status(
    State(state): State<AppState>,
    admin: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = admin_service::toggle_user_status(&state, &admin, id).await?;
    Ok(Json(resp))
}
