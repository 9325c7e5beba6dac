use std::sync::Arc;

use axum::extract::FromRef;
use common_auth::TokenCodec;

use crate::credentials::CredentialVerifier;
use crate::identity::IdentityResolver;
use crate::metrics::ServiceMetrics;
use crate::store::{CatalogStore, UserStore};

/// Shared application state used by handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub resolver: IdentityResolver,
    pub credentials: CredentialVerifier,
    pub codec: Arc<TokenCodec>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        catalog: Arc<dyn CatalogStore>,
        codec: Arc<TokenCodec>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        let resolver = IdentityResolver::new(users.clone());
        let credentials = CredentialVerifier::new(resolver.clone());
        Self {
            users,
            catalog,
            resolver,
            credentials,
            codec,
            metrics,
        }
    }
}

impl FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(state: &AppState) -> Self {
        state.codec.clone()
    }
}

impl FromRef<AppState> for Arc<ServiceMetrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}
