//! Short URL creation and resolution.

use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{InsertOutcome, UrlRepository};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_url;
use serde_json::json;
use tracing::{debug, info, warn};

/// Outcome of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrlResult {
    pub id: String,
    pub short_url: String,
    pub original_url: String,
    /// `false` when the URL had already been shortened.
    pub created: bool,
}

/// Service for creating and resolving short URLs.
///
/// Stateless apart from its collaborators; one instance is shared by every
/// request. No lock is held across the generate, check and insert steps: the
/// repository's atomic insert is the only coordination point.
pub struct UrlService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    generator: CodeGenerator,
    base_url: String,
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    /// Creates a new URL service.
    ///
    /// `base_url` is the prefix short codes are appended to, e.g.
    /// `https://sho.rt/u`.
    pub fn new(repository: Arc<R>, generator: CodeGenerator, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            generator,
            base_url: base_url.into(),
        }
    }

    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }

    /// Creates (or returns the existing) short URL for `url`.
    ///
    /// # Flow
    ///
    /// 1. Validate the input
    /// 2. Derive the candidate code from the URL digest
    /// 3. Look the code up; a record with the same URL is returned as-is
    /// 4. Before the first insert, look the URL up by value; a record stored
    ///    under a code of another length (e.g. before `CODE_LENGTH` changed)
    ///    is returned as-is
    /// 5. Otherwise insert atomically; losing a race to the same URL is success
    /// 6. A code held by a different URL moves on to the next, longer candidate
    ///
    /// Calling this twice with the same URL yields the same id and one record,
    /// even across code length changes.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is empty, malformed or not HTTP(S);
    ///   the store is not touched
    /// - [`AppError::Conflict`] if every candidate code is taken by another URL
    /// - [`AppError::Storage`] if the store fails; safe to retry
    pub async fn create_short_url(&self, url: &str) -> Result<ShortUrlResult, AppError> {
        let url = validate_url(url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let mut checked_by_url = false;

        for id in self.generator.candidates(url) {
            if let Some(existing) = self.repository.find_by_id(&id).await? {
                if existing.points_to(url) {
                    debug!(id = %existing.id, "URL already shortened");
                    return Ok(self.to_result(existing, false));
                }

                warn!(id = %id, "Short code collision, extending code");
                continue;
            }

            if !checked_by_url {
                checked_by_url = true;
                if let Some(existing) = self.repository.find_by_original_url(url).await? {
                    debug!(id = %existing.id, "URL already shortened under another code length");
                    return Ok(self.to_result(existing, false));
                }
            }

            match self
                .repository
                .insert(NewUrlRecord::new(id.as_str(), url))
                .await?
            {
                InsertOutcome::Inserted(record) => {
                    info!(id = %record.id, "Short URL created");
                    return Ok(self.to_result(record, true));
                }
                InsertOutcome::AlreadyExists(existing) if existing.points_to(url) => {
                    debug!(id = %existing.id, "Concurrent create of the same URL");
                    return Ok(self.to_result(existing, false));
                }
                InsertOutcome::AlreadyExists(_) => {
                    warn!(id = %id, "Short code taken concurrently, extending code");
                }
            }
        }

        Err(AppError::conflict(
            "No free short code for this URL",
            json!({
                "url": url,
                "max_length": self.generator.max_length(),
            }),
        ))
    }

    /// Resolves a short code to its original URL.
    ///
    /// Codes that no generator length could have produced are reported as
    /// not found without a store read.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `id` is empty or blank
    /// - [`AppError::NotFound`] if no record has this id
    /// - [`AppError::Storage`] if the store fails
    pub async fn resolve_short_url(&self, id: &str) -> Result<String, AppError> {
        let id = id.trim();

        if id.is_empty() {
            return Err(AppError::bad_request(
                "Short URL id is required",
                json!({ "id": id }),
            ));
        }

        if !self.generator.is_well_formed(id) {
            return Err(not_found(id));
        }

        self.repository
            .find_by_id(id)
            .await?
            .map(|record| record.original_url)
            .ok_or_else(|| not_found(id))
    }

    /// Looks up the record for an original URL via the secondary index.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError> {
        self.repository.find_by_original_url(url.trim()).await
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn record_count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Builds the fully qualified short URL for `id`.
    pub fn short_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), id)
    }

    fn to_result(&self, record: UrlRecord, created: bool) -> ShortUrlResult {
        ShortUrlResult {
            short_url: self.short_url(&record.id),
            id: record.id,
            original_url: record.original_url,
            created,
        }
    }
}

fn not_found(id: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "id": id }))
}
