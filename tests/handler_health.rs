mod common;

use axum_test::TestServer;
use std::sync::Arc;
use url_shortener_service::infrastructure::cache::NullCache;
use url_shortener_service::infrastructure::persistence::InMemoryUrlRepository;
use url_shortener_service::routes::router;

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = TestServer::new(router(common::create_test_state())).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = TestServer::new(router(common::create_test_state())).unwrap();

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("storage").is_some());
    assert!(json["checks"].get("cache").is_some());
}

#[tokio::test]
async fn test_health_degraded_when_storage_fails() {
    let state = common::create_test_state_with(
        Arc::new(common::UnavailableRepository),
        Arc::new(NullCache::new()),
    );
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["storage"]["status"], "error");
}

#[tokio::test]
async fn test_health_degraded_when_cache_fails() {
    let state = common::create_test_state_with(
        Arc::new(InMemoryUrlRepository::default()),
        Arc::new(common::BrokenCache),
    );
    let server = TestServer::new(router(state)).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["cache"]["status"], "error");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
}
