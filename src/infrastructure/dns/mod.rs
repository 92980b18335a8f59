//! DNS resolver implementations.

mod system_resolver;

pub use system_resolver::{DEFAULT_LOOKUP_TIMEOUT, SystemResolver};
