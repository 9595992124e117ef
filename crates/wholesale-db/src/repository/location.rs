//! SurrealDB implementation of [`LocationRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wholesale_core::error::WholesaleResult;
use wholesale_core::models::address::Address;
use wholesale_core::models::location::{CreateLocation, Location, UpdateLocation};
use wholesale_core::repository::LocationRepository;

use crate::error::{DbError, parse_uuid};

const ENTITY: &str = "location";

#[derive(Debug, SurrealValue)]
struct LocationRow {
    record_id: String,
    shop: String,
    company_id: String,
    remote_location_id: String,
    name: String,
    shipping: Option<serde_json::Value>,
    billing: Option<serde_json::Value>,
    is_default_shipping: bool,
    is_default_billing: bool,
    created_at: DateTime<Utc>,
}

impl LocationRow {
    fn try_into_location(self) -> Result<Location, DbError> {
        Ok(Location {
            id: parse_uuid(ENTITY, &self.record_id)?,
            shop: self.shop,
            company_id: parse_uuid(ENTITY, &self.company_id)?,
            remote_location_id: self.remote_location_id,
            name: self.name,
            shipping: self.shipping.as_ref().and_then(Address::from_json),
            billing: self.billing.as_ref().and_then(Address::from_json),
            is_default_shipping: self.is_default_shipping,
            is_default_billing: self.is_default_billing,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Location repository.
#[derive(Clone)]
pub struct SurrealLocationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealLocationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> LocationRepository for SurrealLocationRepository<C> {
    async fn create(&self, input: CreateLocation) -> WholesaleResult<Location> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        self.db
            .query(
                "CREATE type::record('location', $id) SET \
                 shop = $shop, company_id = $company_id, \
                 remote_location_id = $remote_location_id, \
                 name = $name, shipping = $shipping, billing = $billing, \
                 is_default_shipping = $is_default_shipping, \
                 is_default_billing = $is_default_billing",
            )
            .bind(("id", id_str.clone()))
            .bind(("shop", input.shop.clone()))
            .bind(("company_id", input.company_id.to_string()))
            .bind(("remote_location_id", input.remote_location_id.clone()))
            .bind(("name", input.name))
            .bind(("shipping", input.shipping.as_ref().map(Address::to_json)))
            .bind(("billing", input.billing.as_ref().map(Address::to_json)))
            .bind(("is_default_shipping", input.is_default_shipping))
            .bind(("is_default_billing", input.is_default_billing))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        self.find_by_remote_id(&input.shop, &input.remote_location_id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id_str).into())
    }

    async fn find_by_remote_id(
        &self,
        shop: &str,
        remote_location_id: &str,
    ) -> WholesaleResult<Option<Location>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM location \
                 WHERE shop = $shop AND remote_location_id = $remote_location_id",
            )
            .bind(("shop", shop.to_string()))
            .bind(("remote_location_id", remote_location_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(LocationRow::try_into_location)
            .transpose()?)
    }

    async fn list_by_company(&self, shop: &str, company_id: Uuid) -> WholesaleResult<Vec<Location>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM location \
                 WHERE shop = $shop AND company_id = $company_id \
                 ORDER BY created_at ASC",
            )
            .bind(("shop", shop.to_string()))
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LocationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(LocationRow::try_into_location)
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update(
        &self,
        shop: &str,
        remote_location_id: &str,
        input: UpdateLocation,
    ) -> WholesaleResult<Location> {
        let current = self
            .find_by_remote_id(shop, remote_location_id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, remote_location_id.to_string()))?;

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.shipping.is_some() {
            sets.push("shipping = $shipping");
        }
        if input.billing.is_some() {
            sets.push("billing = $billing");
        }
        if sets.is_empty() {
            return Ok(current);
        }

        let query = format!(
            "UPDATE type::record('location', $id) SET {} WHERE shop = $shop",
            sets.join(", ")
        );
        let mut builder = self
            .db
            .query(&query)
            .bind(("id", current.id.to_string()))
            .bind(("shop", shop.to_string()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(shipping) = input.shipping {
            builder = builder.bind(("shipping", shipping.to_json()));
        }
        if let Some(billing) = input.billing {
            builder = builder.bind(("billing", billing.to_json()));
        }
        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        self.find_by_remote_id(shop, remote_location_id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, remote_location_id.to_string()).into())
    }
}
