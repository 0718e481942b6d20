use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::response::ApiResponse;

pub const SERVICE_NAME: &str = "Food Delivery API";

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct Endpoints {
    pub auth: String,
    pub admin: String,
    pub restaurants: String,
    pub cart: String,
    pub health: String,
    pub docs: String,
}

#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
        tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    };

    Json(ApiResponse::success(
        format!("{SERVICE_NAME} is running"),
        data,
        None,
    ))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner and endpoint index", body = ApiResponse<ServiceInfo>),
    ),
    tag = "Health"
)]
pub async fn root() -> Json<ApiResponse<ServiceInfo>> {
    let info = ServiceInfo {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            auth: "/api/auth".to_string(),
            admin: "/api/admin".to_string(),
            restaurants: "/api/restaurants".to_string(),
            cart: "/api/cart".to_string(),
            health: "/health".to_string(),
            docs: "/docs".to_string(),
        },
    };

    Json(ApiResponse::success(
        format!("Welcome to {SERVICE_NAME}"),
        info,
        None,
    ))
}
