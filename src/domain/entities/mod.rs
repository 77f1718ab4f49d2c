//! Core domain entities.
//!
//! A record is created once and never updated or deleted, so the entity is a
//! plain data structure. The caller supplies a [`NewUrlRecord`]; the store
//! turns it into a [`UrlRecord`] by stamping the audit fields.

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
