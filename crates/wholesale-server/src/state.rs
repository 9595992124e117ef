//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;
use wholesale_auth::SessionVerifier;
use wholesale_core::repository::MirrorStore;
use wholesale_platform::PlatformGateway;
use wholesale_provisioning::ProvisioningService;

pub struct AppState<G: PlatformGateway, M: MirrorStore> {
    pub service: Arc<ProvisioningService<G, M>>,
    pub verifier: Arc<SessionVerifier>,
}

impl<G: PlatformGateway, M: MirrorStore> AppState<G, M> {
    pub fn new(service: ProvisioningService<G, M>, verifier: SessionVerifier) -> Self {
        Self {
            service: Arc::new(service),
            verifier: Arc::new(verifier),
        }
    }
}

// Derived Clone would require G and M to be Clone.
impl<G: PlatformGateway, M: MirrorStore> Clone for AppState<G, M> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

impl<G: PlatformGateway, M: MirrorStore> FromRef<AppState<G, M>> for Arc<SessionVerifier> {
    fn from_ref(state: &AppState<G, M>) -> Self {
        Arc::clone(&state.verifier)
    }
}
