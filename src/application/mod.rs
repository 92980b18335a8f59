//! Application layer services implementing business logic.
//!
//! Services orchestrate domain operations through repository and resolver
//! traits and expose a small API to HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::resolution_service::ResolutionService`] - Create-or-fetch and resolve
//! - [`services::url_validator::UrlValidator`] - Grammar and DNS validation

pub mod services;
