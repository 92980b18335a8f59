#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use shorturl::api::handlers::health_handler;
use shorturl::api::routes::api_routes;
use shorturl::domain::host_resolver::{HostResolver, ResolveError};
use shorturl::error::ErrorStatusPolicy;
use shorturl::infrastructure::persistence::InMemoryMappingRepository;
use shorturl::state::AppState;

/// Resolver that answers without touching the network.
///
/// Hosts under the reserved `.invalid` TLD fail; everything else resolves
/// to 127.0.0.1.
#[derive(Default)]
pub struct StubResolver {
    lookups: AtomicUsize,
}

impl StubResolver {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostResolver for StubResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if host.to_ascii_lowercase().ends_with(".invalid") {
            Err(ResolveError::LookupFailed("NXDOMAIN".to_string()))
        } else {
            Ok(vec![IpAddr::from([127, 0, 0, 1])])
        }
    }
}

pub struct TestContext {
    pub state: AppState,
    pub mappings: Arc<InMemoryMappingRepository>,
    pub resolver: Arc<StubResolver>,
}

pub fn create_test_context(policy: ErrorStatusPolicy) -> TestContext {
    let mappings = Arc::new(InMemoryMappingRepository::new());
    let resolver = Arc::new(StubResolver::default());

    let state = AppState::new(mappings.clone(), resolver.clone(), policy);

    TestContext {
        state,
        mappings,
        resolver,
    }
}

pub fn create_test_state() -> AppState {
    create_test_context(ErrorStatusPolicy::Compatible).state
}

pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .with_state(state)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(test_app(state)).unwrap()
}
