//! DTOs for short URL creation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ShortUrlResult;

/// Request to shorten a single URL.
///
/// Only emptiness is checked here. The length limit applies to the trimmed
/// URL, so it is left to the service along with scheme and syntax.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortUrlRequest {
    #[validate(length(min = 1, message = "URL must not be empty"))]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ShortUrlResponse {
    pub id: String,
    pub short_url: String,
    pub original_url: String,
}

impl From<ShortUrlResult> for ShortUrlResponse {
    fn from(result: ShortUrlResult) -> Self {
        Self {
            id: result.id,
            short_url: result.short_url,
            original_url: result.original_url,
        }
    }
}
