//! Resolving a shop domain to the credentials needed to call the
//! platform on its behalf.

use tracing::{debug, warn};
use wholesale_core::error::{WholesaleError, WholesaleResult};
use wholesale_core::models::tenant_session::TenantSession;
use wholesale_core::repository::TenantSessionRepository;
use wholesale_platform::TenantContext;

/// Read-only view over stored tenant sessions. Never creates sessions;
/// those are written at install time.
pub struct TenantContextResolver<'a, R> {
    sessions: &'a R,
}

impl<'a, R: TenantSessionRepository> TenantContextResolver<'a, R> {
    pub fn new(sessions: &'a R) -> Self {
        Self { sessions }
    }

    async fn session(&self, shop: &str) -> WholesaleResult<TenantSession> {
        self.sessions
            .find_by_shop(shop)
            .await?
            .ok_or_else(|| {
                warn!(shop, "No tenant session stored for shop");
                WholesaleError::NotFound {
                    entity: "tenant_session".into(),
                    id: shop.to_string(),
                }
            })
    }

    /// Context for platform calls. Storage failures pass through as
    /// `Database`; a session without a token is `TenantCredentialMissing`.
    pub async fn resolve(&self, shop: &str) -> WholesaleResult<TenantContext> {
        let session = self.session(shop).await?;
        let token = session
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                warn!(shop, "Tenant session has no access token");
                WholesaleError::TenantCredentialMissing {
                    shop: shop.to_string(),
                }
            })?;
        debug!(shop, "Resolved tenant context");
        Ok(TenantContext::new(session.shop, token))
    }

    /// Check an app-issued API key against the one stored for the shop.
    pub async fn authorize_api_key(&self, shop: &str, provided: &str) -> WholesaleResult<()> {
        let provided = provided.trim();
        // An unknown shop is indistinguishable from a wrong key.
        let session = self.sessions.find_by_shop(shop).await?;
        match session.as_ref().and_then(|s| s.api_key.as_deref()) {
            Some(expected) if !provided.is_empty() && expected == provided => Ok(()),
            _ => {
                warn!(shop, "API key rejected");
                Err(WholesaleError::AuthenticationFailed {
                    reason: "API key not matching".into(),
                })
            }
        }
    }
}
