//! Cross-origin resource sharing.

use tower_http::cors::CorsLayer;

/// Permissive CORS: any origin, method and header.
///
/// The API is meant to be called from pages served elsewhere (for example
/// a test runner hosted on another domain).
pub fn layer() -> CorsLayer {
    CorsLayer::permissive()
}
