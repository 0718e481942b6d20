use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, UpdateCartItemRequest},
    error::AppResult,
    extract::{ApiJson, ApiPath},
    middleware::auth::{AuthUser, USERS_ONLY, require_roles},
    models::Cart,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{restaurant_id}", get(get_cart).delete(clear_cart))
        .route("/{restaurant_id}/items", post(add_item))
        .route(
            "/{restaurant_id}/items/{item_id}",
            put(update_item).delete(remove_item),
        )
        .route_layer(middleware::from_fn_with_state(USERS_ONLY, require_roles))
}

#[utoipa::path(
    get,
    path = "/api/cart/{restaurant_id}",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Current cart for the restaurant", body = ApiResponse<Cart>),
        (status = 404, description = "Cart not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(restaurant_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::get_cart(&state, &user, restaurant_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/{restaurant_id}/items",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added or merged", body = ApiResponse<Cart>),
        (status = 400, description = "Invalid quantity or item"),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(restaurant_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::add_item(&state, &user, restaurant_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/cart/{restaurant_id}/items/{item_id}",
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID"),
        ("item_id" = Uuid, Path, description = "Item ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity set; zero or less removes the line", body = ApiResponse<Cart>),
        (status = 404, description = "Cart or line not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath((restaurant_id, item_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp =
        cart_service::update_item_quantity(&state, &user, restaurant_id, item_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{restaurant_id}/items/{item_id}",
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID"),
        ("item_id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<Cart>),
        (status = 404, description = "Cart or line not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath((restaurant_id, item_id)): ApiPath<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::remove_item(&state, &user, restaurant_id, item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{restaurant_id}",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<Cart>),
        (status = 404, description = "Cart not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(restaurant_id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Cart>>> {
    let resp = cart_service::clear_cart(&state, &user, restaurant_id).await?;
    Ok(Json(resp))
}
