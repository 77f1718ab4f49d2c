#![allow(dead_code)]

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;
use std::sync::Arc;
use url_shortener_service::application::services::UrlService;
use url_shortener_service::domain::entities::{NewUrlRecord, UrlRecord};
use url_shortener_service::domain::repositories::{InsertOutcome, UrlRepository};
use url_shortener_service::error::AppError;
use url_shortener_service::infrastructure::cache::{
    CacheError, CacheResult, CacheService, NullCache,
};
use url_shortener_service::infrastructure::persistence::InMemoryUrlRepository;
use url_shortener_service::state::AppState;
use url_shortener_service::utils::code_generator::CodeGenerator;

pub const BASE_URL: &str = "https://sho.rt/u";

pub fn create_service(repository: Arc<dyn UrlRepository>) -> Arc<UrlService<dyn UrlRepository>> {
    Arc::new(UrlService::new(
        repository,
        CodeGenerator::default(),
        BASE_URL,
    ))
}

pub fn create_test_state() -> AppState {
    create_test_state_with(
        Arc::new(InMemoryUrlRepository::new("test")),
        Arc::new(NullCache::new()),
    )
}

pub fn create_test_state_with(
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
) -> AppState {
    AppState::new(create_service(repository), cache)
}

/// Cache that keeps entries in a map, for asserting read-through behavior.
#[derive(Default)]
pub struct MapCache {
    pub entries: DashMap<String, String>,
}

#[async_trait]
impl CacheService for MapCache {
    async fn get_url(&self, id: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.get(id).map(|e| e.value().clone()))
    }

    async fn set_url(&self, id: &str, original_url: &str, _ttl: Option<u64>) -> CacheResult<()> {
        self.entries.insert(id.to_string(), original_url.to_string());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "map"
    }
}

/// Cache whose every operation fails.
pub struct BrokenCache;

#[async_trait]
impl CacheService for BrokenCache {
    async fn get_url(&self, _id: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn set_url(&self, _id: &str, _url: &str, _ttl: Option<u64>) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "broken"
    }
}

/// Store whose every operation fails with a storage error.
pub struct UnavailableRepository;

fn unavailable() -> AppError {
    AppError::storage("Store unavailable", json!({}))
}

#[async_trait]
impl UrlRepository for UnavailableRepository {
    async fn find_by_id(&self, _id: &str) -> Result<Option<UrlRecord>, AppError> {
        Err(unavailable())
    }

    async fn find_by_original_url(&self, _url: &str) -> Result<Option<UrlRecord>, AppError> {
        Err(unavailable())
    }

    async fn insert(&self, _new_record: NewUrlRecord) -> Result<InsertOutcome, AppError> {
        Err(unavailable())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(unavailable())
    }
}
