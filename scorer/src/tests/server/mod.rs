pub mod call_routes;

use axum::http::StatusCode;
use rstest::*;

use crate::tests::common::TestConfigBuilder;

#[rstest]
#[tokio::test]
async fn test_health_endpoint() {
    let services = TestConfigBuilder::new().configure_api_server().build().await;

    let response = reqwest::get(format!("{}/health", services.base_url())).await.unwrap();

    assert_eq!(response.status().as_u16(), StatusCode::OK.as_u16());
    assert_eq!(response.text().await.unwrap(), "UP");
}

#[rstest]
#[tokio::test]
async fn test_unknown_route_falls_back_to_404() {
    let services = TestConfigBuilder::new().configure_api_server().build().await;

    let response = reqwest::get(format!("{}/api/v2/score", services.base_url())).await.unwrap();

    assert_eq!(response.status().as_u16(), StatusCode::NOT_FOUND.as_u16());
    assert_eq!(response.text().await.unwrap(), "The requested resource was not found");
}

#[rstest]
#[tokio::test]
async fn test_server_shuts_down_gracefully() {
    let mut services = TestConfigBuilder::new().configure_api_server().build().await;
    let base_url = services.base_url();

    services.server_handle.take().unwrap().shutdown().await.unwrap();

    assert!(reqwest::get(format!("{}/health", base_url)).await.is_err());
}
