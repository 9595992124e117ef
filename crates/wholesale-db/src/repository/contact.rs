//! SurrealDB implementation of [`ContactRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wholesale_core::error::WholesaleResult;
use wholesale_core::models::contact::{CompanyContact, CreateCompanyContact};
use wholesale_core::repository::ContactRepository;

use crate::error::{DbError, parse_uuid};

const ENTITY: &str = "company_contact";

#[derive(Debug, SurrealValue)]
struct ContactRow {
    record_id: String,
    shop: String,
    remote_customer_id: String,
    remote_contact_id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    approved: bool,
    created_at: DateTime<Utc>,
}

impl ContactRow {
    fn try_into_contact(self) -> Result<CompanyContact, DbError> {
        Ok(CompanyContact {
            id: parse_uuid(ENTITY, &self.record_id)?,
            shop: self.shop,
            remote_customer_id: self.remote_customer_id,
            remote_contact_id: self.remote_contact_id,
            name: self.name,
            email: self.email,
            approved: self.approved,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the CompanyContact repository.
#[derive(Clone)]
pub struct SurrealContactRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealContactRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ContactRepository for SurrealContactRepository<C> {
    async fn create(&self, input: CreateCompanyContact) -> WholesaleResult<CompanyContact> {
        let id = input.id.unwrap_or_else(Uuid::new_v4);

        self.db
            .query(
                "CREATE type::record('company_contact', $id) SET \
                 shop = $shop, \
                 remote_customer_id = $remote_customer_id, \
                 remote_contact_id = $remote_contact_id, \
                 name = $name, email = $email, approved = $approved",
            )
            .bind(("id", id.to_string()))
            .bind(("shop", input.shop.clone()))
            .bind(("remote_customer_id", input.remote_customer_id))
            .bind(("remote_contact_id", input.remote_contact_id))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("approved", input.approved))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        self.get_by_id(&input.shop, id).await
    }

    async fn get_by_id(&self, shop: &str, id: Uuid) -> WholesaleResult<CompanyContact> {
        let id_str = id.to_string();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('company_contact', $id) WHERE shop = $shop",
            )
            .bind(("id", id_str.clone()))
            .bind(("shop", shop.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ContactRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, id_str))?;
        Ok(row.try_into_contact()?)
    }

    async fn find_by_customer(
        &self,
        shop: &str,
        remote_customer_id: &str,
    ) -> WholesaleResult<Option<CompanyContact>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM company_contact \
                 WHERE shop = $shop AND remote_customer_id = $customer",
            )
            .bind(("shop", shop.to_string()))
            .bind(("customer", remote_customer_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ContactRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(ContactRow::try_into_contact)
            .transpose()?)
    }

    async fn link_remote(
        &self,
        shop: &str,
        id: Uuid,
        remote_contact_id: Option<String>,
    ) -> WholesaleResult<CompanyContact> {
        // Keep an already linked platform contact id when this call has none.
        self.db
            .query(
                "UPDATE type::record('company_contact', $id) SET \
                 remote_contact_id = $remote_contact_id ?? remote_contact_id, \
                 approved = true \
                 WHERE shop = $shop",
            )
            .bind(("id", id.to_string()))
            .bind(("shop", shop.to_string()))
            .bind(("remote_contact_id", remote_contact_id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        self.get_by_id(shop, id).await
    }
}
