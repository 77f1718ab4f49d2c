//! Repository trait definitions for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence`; a mock is
//! generated with `mockall` for service tests.

pub mod url_repository;

pub use url_repository::{InsertOutcome, UrlRepository};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
