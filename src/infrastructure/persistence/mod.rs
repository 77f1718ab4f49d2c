//! [`crate::domain::repositories::UrlRepository`] implementations.
//!
//! - [`PgUrlRepository`] - PostgreSQL via SQLx, unique primary key on `id`
//! - [`InMemoryUrlRepository`] - process-local `DashMap`, for development and tests

pub mod memory_url_repository;
pub mod pg_url_repository;

pub use memory_url_repository::InMemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
