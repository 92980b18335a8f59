//! Helpers shared across layers.
//!
//! - [`url_grammar`] - URL grammar check and host extraction
//! - [`db_error`] - Unique constraint interpretation

pub mod db_error;
pub mod url_grammar;
