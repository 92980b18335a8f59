//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{DynResolutionService, ResolutionService};
use crate::domain::host_resolver::HostResolver;
use crate::domain::repositories::MappingRepository;
use crate::error::ErrorStatusPolicy;

#[derive(Clone)]
pub struct AppState {
    pub resolution_service: Arc<DynResolutionService>,
    pub mappings: Arc<dyn MappingRepository>,
    pub error_status: ErrorStatusPolicy,
}

impl AppState {
    /// Wires the resolution service over the given backends.
    pub fn new(
        mappings: Arc<dyn MappingRepository>,
        resolver: Arc<dyn HostResolver>,
        error_status: ErrorStatusPolicy,
    ) -> Self {
        let resolution_service = Arc::new(ResolutionService::new(mappings.clone(), resolver));

        Self {
            resolution_service,
            mappings,
            error_status,
        }
    }
}
