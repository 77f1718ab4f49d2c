//! Persisted mapping from a short code to its original URL.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored short URL with audit metadata.
///
/// `id` and `original_url` are immutable once assigned. Audit fields are set by
/// the store at insert time and never touched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    pub id: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl UrlRecord {
    /// Builds a freshly inserted record, stamping creation and modification
    /// metadata with the same actor and time.
    pub fn stamped(new_record: NewUrlRecord, actor: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: new_record.id,
            original_url: new_record.original_url,
            created_at: now,
            created_by: actor.to_string(),
            modified_at: Some(now),
            modified_by: Some(actor.to_string()),
        }
    }

    /// Returns true if this record maps to `url`.
    pub fn points_to(&self, url: &str) -> bool {
        self.original_url == url
    }
}

/// Input for inserting a record. The store adds the audit fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub id: String,
    pub original_url: String,
}

impl NewUrlRecord {
    pub fn new(id: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_url: original_url.into(),
        }
    }
}
