//! Domain layer: the URL record entity and the storage contract.
//!
//! Nothing in here knows about HTTP, PostgreSQL or Redis. Concrete stores live
//! in [`crate::infrastructure::persistence`]; the create and resolve flows that
//! drive them live in [`crate::application::services`].
//!
//! # Modules
//!
//! - [`entities`] - [`entities::UrlRecord`] and its insert input
//! - [`repositories`] - [`repositories::UrlRepository`] trait

pub mod entities;
pub mod repositories;
