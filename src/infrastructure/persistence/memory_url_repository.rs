//! In-memory implementation of the URL repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{InsertOutcome, UrlRepository};
use crate::error::AppError;

/// Process-local repository backed by a `DashMap`.
///
/// Inserts go through the map's entry API, which holds the shard lock for the
/// key while checking and writing, so concurrent inserts of one id resolve to
/// a single winner. Records are lost on restart.
#[derive(Debug)]
pub struct InMemoryUrlRepository {
    storage: DashMap<String, UrlRecord>,
    actor: String,
}

impl InMemoryUrlRepository {
    /// Creates an empty repository stamping `created_by` with `actor`.
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            storage: DashMap::new(),
            actor: actor.into(),
        }
    }
}

impl Default for InMemoryUrlRepository {
    fn default() -> Self {
        Self::new("system")
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.storage.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self
            .storage
            .iter()
            .filter(|entry| entry.points_to(url))
            .map(|entry| entry.value().clone())
            .min_by_key(|record| record.created_at))
    }

    async fn insert(&self, new_record: NewUrlRecord) -> Result<InsertOutcome, AppError> {
        match self.storage.entry(new_record.id.clone()) {
            Entry::Occupied(entry) => Ok(InsertOutcome::AlreadyExists(entry.get().clone())),
            Entry::Vacant(entry) => {
                let record = UrlRecord::stamped(new_record, &self.actor, Utc::now());
                entry.insert(record.clone());
                Ok(InsertOutcome::Inserted(record))
            }
        }
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.storage.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn insert_and_find_by_id() {
        let repo = InMemoryUrlRepository::new("tester");

        let outcome = repo
            .insert(NewUrlRecord::new("abc12345", "https://example.com"))
            .await
            .unwrap();
        assert!(outcome.is_inserted());

        let record = repo.find_by_id("abc12345").await.unwrap().unwrap();
        assert_eq!(record.original_url, "https://example.com");
        assert_eq!(record.created_by, "tester");
        assert_eq!(record.modified_by.as_deref(), Some("tester"));
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let repo = InMemoryUrlRepository::default();

        assert!(repo.find_by_id("nothere1").await.unwrap().is_none());
        assert!(
            repo.find_by_original_url("https://nothere.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_insert_returns_existing_unchanged() {
        let repo = InMemoryUrlRepository::default();

        let first = repo
            .insert(NewUrlRecord::new("abc12345", "https://first.com"))
            .await
            .unwrap();
        let second = repo
            .insert(NewUrlRecord::new("abc12345", "https://second.com"))
            .await
            .unwrap();

        assert!(!second.is_inserted());
        assert_eq!(second.record(), first.record());
        assert_eq!(second.into_record().original_url, "https://first.com");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_by_original_url() {
        let repo = InMemoryUrlRepository::default();
        repo.insert(NewUrlRecord::new("abc12345", "https://a.com"))
            .await
            .unwrap();
        repo.insert(NewUrlRecord::new("xyz98765", "https://b.com"))
            .await
            .unwrap();

        let record = repo
            .find_by_original_url("https://b.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.id, "xyz98765");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_have_one_winner() {
        let repo = Arc::new(InMemoryUrlRepository::default());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert(NewUrlRecord::new("race1234", format!("https://{i}.com")))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut winners = 0;
        let mut urls = Vec::new();
        for handle in handles {
            let outcome = handle.await.unwrap();
            if outcome.is_inserted() {
                winners += 1;
            }
            urls.push(outcome.into_record().original_url);
        }

        assert_eq!(winners, 1);
        assert!(urls.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
