//! API route configuration.

use crate::api::handlers::{hello_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All `/api` routes.
///
/// # Endpoints
///
/// - `POST /shorturl`             - Create or fetch a short url
/// - `GET  /shorturl/{shorturl}`  - Redirect to the original URL
/// - `GET  /hello`                - Greeting
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorturl", post(shorten_handler))
        .route("/shorturl/{shorturl}", get(redirect_handler))
        .route("/hello", get(hello_handler))
}
