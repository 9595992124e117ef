//! SurrealDB implementation of [`SettingsRepository`].

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use wholesale_core::error::WholesaleResult;
use wholesale_core::models::settings::TenantSettings;
use wholesale_core::repository::SettingsRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SettingsRow {
    shop: String,
    auto_approval: bool,
}

impl From<SettingsRow> for TenantSettings {
    fn from(row: SettingsRow) -> Self {
        TenantSettings {
            shop: row.shop,
            auto_approval: row.auto_approval,
        }
    }
}

/// Settings live in a record keyed by the shop domain itself.
#[derive(Clone)]
pub struct SurrealSettingsRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSettingsRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SettingsRepository for SurrealSettingsRepository<C> {
    async fn get(&self, shop: &str) -> WholesaleResult<Option<TenantSettings>> {
        let mut result = self
            .db
            .query("SELECT shop, auto_approval FROM type::record('tenant_settings', $shop)")
            .bind(("shop", shop.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SettingsRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(TenantSettings::from))
    }

    async fn upsert(&self, settings: TenantSettings) -> WholesaleResult<TenantSettings> {
        let mut result = self
            .db
            .query(
                "UPSERT type::record('tenant_settings', $shop) SET \
                 shop = $shop, auto_approval = $auto_approval \
                 RETURN shop, auto_approval",
            )
            .bind(("shop", settings.shop.clone()))
            .bind(("auto_approval", settings.auto_approval))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement("tenant_settings", e))?;

        let rows: Vec<SettingsRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(TenantSettings::from)
            .unwrap_or(settings))
    }
}
