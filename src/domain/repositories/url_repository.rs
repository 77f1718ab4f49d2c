//! Storage contract for short URL records.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Result of an atomic insert-or-return-existing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record did not exist and was written by this call.
    Inserted(UrlRecord),
    /// A record with the same id already existed; it is returned unchanged.
    /// Its `original_url` may differ from the one that was submitted.
    AlreadyExists(UrlRecord),
}

impl InsertOutcome {
    pub fn record(&self) -> &UrlRecord {
        match self {
            InsertOutcome::Inserted(record) | InsertOutcome::AlreadyExists(record) => record,
        }
    }

    pub fn into_record(self) -> UrlRecord {
        match self {
            InsertOutcome::Inserted(record) | InsertOutcome::AlreadyExists(record) => record,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Durable mapping from short code to [`UrlRecord`].
///
/// # Atomicity
///
/// [`UrlRepository::insert`] is the only coordination point between concurrent
/// creators. For any id, exactly one concurrent insert observes
/// [`InsertOutcome::Inserted`]; every other caller receives
/// [`InsertOutcome::AlreadyExists`] carrying the winning record. An insert is
/// all-or-nothing: a cancelled call never leaves a partial record behind.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - `DashMap`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store cannot be reached.
    async fn find_by_id(&self, id: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a record by its original URL.
    ///
    /// With content-addressed codes this is never needed on the create path;
    /// it backs operator lookups.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store cannot be reached.
    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Inserts a record unless one with the same id exists.
    ///
    /// Audit fields are stamped by the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failures. An existing id is not
    /// an error; it is reported as [`InsertOutcome::AlreadyExists`].
    async fn insert(&self, new_record: NewUrlRecord) -> Result<InsertOutcome, AppError>;

    /// Counts stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store cannot be reached.
    async fn count(&self) -> Result<i64, AppError>;
}
