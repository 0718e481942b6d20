use food_delivery_api::routes::health::{SERVICE_NAME, health_check, root};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert!(response.0.success);
    assert_eq!(response.0.message, format!("{SERVICE_NAME} is running"));

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "OK");
}

#[tokio::test]
async fn root_lists_endpoints() {
    let response = root().await;
    let info = response.0.data.expect("service info");
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(info.endpoints.admin, "/api/admin");
    assert_eq!(info.endpoints.health, "/health");
}
