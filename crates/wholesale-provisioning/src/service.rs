//! Provisioning service: entry points over the pipelines.

use tracing::debug;
use wholesale_core::error::WholesaleResult;
use wholesale_core::models::company::Company;
use wholesale_core::models::preset::Preset;
use wholesale_core::repository::{
    CompanyRepository, MirrorStore, PaginatedResult, Pagination, PresetRepository,
};
use wholesale_platform::{PlatformGateway, TenantContext};

use crate::tenant::TenantContextResolver;

/// Runs the provisioning pipelines for every tenant.
///
/// Generic over the platform gateway and the mirror store so the
/// pipelines can run against in-memory fakes.
pub struct ProvisioningService<G: PlatformGateway, M: MirrorStore> {
    pub(crate) gateway: G,
    pub(crate) store: M,
}

impl<G: PlatformGateway, M: MirrorStore> ProvisioningService<G, M> {
    pub fn new(gateway: G, store: M) -> Self {
        Self { gateway, store }
    }

    pub fn store(&self) -> &M {
        &self.store
    }

    pub(crate) async fn tenant(&self, shop: &str) -> WholesaleResult<TenantContext> {
        TenantContextResolver::new(self.store.sessions())
            .resolve(shop)
            .await
    }

    /// The shop's default preset, or the built-in defaults.
    pub(crate) async fn preset(&self, shop: &str) -> WholesaleResult<Preset> {
        match self.store.presets().find_default(shop).await? {
            Some(preset) => Ok(preset),
            None => {
                debug!(shop, "No default preset, using built-in defaults");
                Ok(Preset::builtin(shop))
            }
        }
    }

    /// Check an app-issued API key for `shop`.
    pub async fn authorize_api_key(&self, shop: &str, api_key: &str) -> WholesaleResult<()> {
        TenantContextResolver::new(self.store.sessions())
            .authorize_api_key(shop, api_key)
            .await
    }

    /// Companies of one shop, newest first.
    pub async fn list_companies(
        &self,
        shop: &str,
        pagination: Pagination,
    ) -> WholesaleResult<PaginatedResult<Company>> {
        self.store.companies().list(shop, pagination).await
    }
}
