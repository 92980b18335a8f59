//! Domain layer: entities and the traits infrastructure must implement.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Storage trait definitions
//! - [`host_resolver`] - DNS resolution trait
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business logic lives in [`crate::application::services`].

pub mod entities;
pub mod host_resolver;
pub mod repositories;
