//! Handler for short url redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::ErrorResponse;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /api/shorturl/{shorturl}`
///
/// Responds with `302 Found` and the stored URL, verbatim, in `Location`.
///
/// # Errors
///
/// `{"error": "invalid url"}` when the code is not an integer, has no
/// mapping, or storage fails.
pub async fn redirect_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ErrorResponse> {
    let mapping = state
        .resolution_service
        .resolve(&short_url)
        .await
        .map_err(|e| e.with_policy(state.error_status))?;

    tracing::debug!(short_code = mapping.short_code, "redirecting");

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, mapping.original_url)],
    )
        .into_response())
}
