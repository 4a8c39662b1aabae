//! Shared application state.
//!
//! Constructed once at process start, shared read-only with every request
//! handler, dropped at shutdown.

use std::sync::Arc;

use cnsearch_core::Resolver;

use crate::auth::ApiKeyStore;

/// Shared state handed to the axum router.
#[derive(Clone)]
pub struct AppState {
    /// The resolution pipeline.
    pub resolver: Arc<Resolver>,
    /// API-key membership check for `/search`.
    pub keys: Arc<dyn ApiKeyStore>,
    /// Whether unresolved queries may fall back to crawling.
    pub crawling: bool,
}

impl AppState {
    /// Bundle the startup-constructed services.
    pub fn new(resolver: Arc<Resolver>, keys: Arc<dyn ApiKeyStore>, crawling: bool) -> Self {
        Self {
            resolver,
            keys,
            crawling,
        }
    }
}
