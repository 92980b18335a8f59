//! Handler for the shortening endpoint.

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};

use crate::api::dto::shorturl::{ShortenForm, ShortenResponse};
use crate::error::{AppError, ErrorResponse};
use crate::state::AppState;

/// Creates (or returns the existing) short url for a submitted URL.
///
/// # Endpoint
///
/// `POST /api/shorturl`, form field `url`
///
/// # Response
///
/// ```json
/// { "original_url": "https://www.example.com", "short_url": 0 }
/// ```
///
/// # Errors
///
/// `{"error": "invalid url"}` when the field is missing, the URL is
/// malformed, its host does not resolve, or storage fails.
pub async fn shorten_handler(
    State(state): State<AppState>,
    form: Result<Form<ShortenForm>, FormRejection>,
) -> Result<Json<ShortenResponse>, ErrorResponse> {
    let policy = state.error_status;

    let url = match form {
        Ok(Form(ShortenForm { url: Some(url) })) => url,
        Ok(Form(ShortenForm { url: None })) => {
            return Err(AppError::malformed("").with_policy(policy));
        }
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable shorten form");
            return Err(AppError::malformed("").with_policy(policy));
        }
    };

    let mapping = state
        .resolution_service
        .create(&url)
        .await
        .map_err(|e| e.with_policy(policy))?;

    Ok(Json(mapping.into()))
}
