//! Business logic services for the application layer.

pub mod resolution_service;
pub mod url_validator;

pub use resolution_service::{DynResolutionService, ResolutionService};
pub use url_validator::UrlValidator;
