//! Handler for short URL creation.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::url::{CreateShortUrlRequest, ShortUrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL, or returns the existing short URL for it.
///
/// # Endpoint
///
/// `POST /u`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/very/long/path" }
/// ```
///
/// # Response
///
/// `201 Created` for a new record, `200 OK` when the URL was already shortened:
///
/// ```json
/// {
///   "id": "HkTRTCTy",
///   "short_url": "http://localhost:3000/u/HkTRTCTy",
///   "original_url": "https://example.com/very/long/path"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body is not a JSON object with a string `url`, or the URL
///   is empty, too long once trimmed, malformed or not HTTP(S)
/// - 409 if every candidate code belongs to another URL
/// - 500 on storage failure
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let result = state.url_service.create_short_url(&payload.url).await?;

    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(result.into())))
}
