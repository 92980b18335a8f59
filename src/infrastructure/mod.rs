//! Infrastructure layer for external integrations.
//!
//! Implements the traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`dns`] - Host resolution against the system resolver
//! - [`persistence`] - PostgreSQL and in-memory mapping repositories

pub mod dns;
pub mod persistence;
