//! Application layer services implementing the create and resolve flows.
//!
//! Services consume the [`crate::domain::repositories::UrlRepository`] trait
//! and expose a transport-agnostic API to the HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL creation and resolution

pub mod services;
