//! SurrealDB implementation of [`TenantSessionRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wholesale_core::error::WholesaleResult;
use wholesale_core::models::tenant_session::{CreateTenantSession, TenantSession};
use wholesale_core::repository::TenantSessionRepository;

use crate::error::{DbError, parse_uuid};

const ENTITY: &str = "tenant_session";

#[derive(SurrealValue)]
struct TenantSessionRow {
    record_id: String,
    shop: String,
    access_token: Option<String>,
    api_key: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantSessionRow {
    fn try_into_session(self) -> Result<TenantSession, DbError> {
        Ok(TenantSession {
            id: parse_uuid(ENTITY, &self.record_id)?,
            shop: self.shop,
            access_token: self.access_token,
            api_key: self.api_key,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_BY_SHOP: &str = "SELECT meta::id(id) AS record_id, * \
     FROM tenant_session WHERE shop = $shop LIMIT 1";

/// SurrealDB implementation of the TenantSession repository.
#[derive(Clone)]
pub struct SurrealTenantSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantSessionRepository for SurrealTenantSessionRepository<C> {
    async fn create(&self, input: CreateTenantSession) -> WholesaleResult<TenantSession> {
        let id = Uuid::new_v4();
        let shop = input.shop.clone();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('tenant_session', $id) SET \
                 shop = $shop, access_token = $access_token, \
                 api_key = $api_key; \
                 {SELECT_BY_SHOP};"
            ))
            .bind(("id", id.to_string()))
            .bind(("shop", input.shop))
            .bind(("access_token", input.access_token))
            .bind(("api_key", input.api_key))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::statement(ENTITY, e))?;
        let rows: Vec<TenantSessionRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, shop))?;
        Ok(row.try_into_session()?)
    }

    async fn find_by_shop(&self, shop: &str) -> WholesaleResult<Option<TenantSession>> {
        let mut result = self
            .db
            .query(SELECT_BY_SHOP)
            .bind(("shop", shop.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantSessionRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(TenantSessionRow::try_into_session)
            .transpose()?)
    }

    async fn rotate_access_token(
        &self,
        shop: &str,
        access_token: String,
    ) -> WholesaleResult<TenantSession> {
        let result = self
            .db
            .query(format!(
                "UPDATE tenant_session SET \
                 access_token = $access_token, updated_at = time::now() \
                 WHERE shop = $shop; \
                 {SELECT_BY_SHOP};"
            ))
            .bind(("shop", shop.to_string()))
            .bind(("access_token", access_token))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::statement(ENTITY, e))?;
        let rows: Vec<TenantSessionRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, shop))?;
        Ok(row.try_into_session()?)
    }
}
