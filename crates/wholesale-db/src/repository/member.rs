//! SurrealDB implementation of [`MemberRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wholesale_core::error::WholesaleResult;
use wholesale_core::models::member::{CompanyMember, CreateCompanyMember};
use wholesale_core::repository::MemberRepository;

use crate::error::{DbError, parse_uuid};

const ENTITY: &str = "company_member";

#[derive(Debug, SurrealValue)]
struct MemberRow {
    record_id: String,
    shop: String,
    location_id: String,
    contact_id: String,
    role_id: Option<String>,
    role_assignment_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    title: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
    fn try_into_member(self) -> Result<CompanyMember, DbError> {
        Ok(CompanyMember {
            id: parse_uuid(ENTITY, &self.record_id)?,
            shop: self.shop,
            location_id: parse_uuid(ENTITY, &self.location_id)?,
            contact_id: self.contact_id,
            role_id: self.role_id,
            role_assignment_id: self.role_assignment_id,
            first_name: self.first_name,
            last_name: self.last_name,
            title: self.title,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const CREATE_MEMBER: &str = "CREATE type::record('company_member', $id) SET \
     shop = $shop, location_id = $location_id, contact_id = $contact_id, \
     role_id = $role_id, role_assignment_id = $role_assignment_id, \
     first_name = $first_name, last_name = $last_name, \
     title = $title, email = $email";

/// SurrealDB implementation of the CompanyMember repository.
#[derive(Clone)]
pub struct SurrealMemberRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMemberRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn get(&self, shop: &str, id: Uuid) -> WholesaleResult<Option<CompanyMember>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('company_member', $id) WHERE shop = $shop",
            )
            .bind(("id", id.to_string()))
            .bind(("shop", shop.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(MemberRow::try_into_member)
            .transpose()?)
    }
}

impl<C: Connection> MemberRepository for SurrealMemberRepository<C> {
    async fn create(&self, input: CreateCompanyMember) -> WholesaleResult<CompanyMember> {
        let id = Uuid::new_v4();
        let shop = input.shop.clone();

        self.db
            .query(CREATE_MEMBER)
            .bind(("id", id.to_string()))
            .bind(("shop", input.shop))
            .bind(("location_id", input.location_id.to_string()))
            .bind(("contact_id", input.contact_id))
            .bind(("role_id", input.role_id))
            .bind(("role_assignment_id", input.role_assignment_id))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("title", input.title))
            .bind(("email", input.email))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        self.get(&shop, id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id.to_string()).into())
    }

    async fn find_by_contact(
        &self,
        shop: &str,
        contact_id: &str,
    ) -> WholesaleResult<Option<CompanyMember>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM company_member \
                 WHERE shop = $shop AND contact_id = $contact_id \
                 ORDER BY updated_at DESC LIMIT 1",
            )
            .bind(("shop", shop.to_string()))
            .bind(("contact_id", contact_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(MemberRow::try_into_member)
            .transpose()?)
    }

    async fn replace(
        &self,
        shop: &str,
        id: Uuid,
        input: CreateCompanyMember,
    ) -> WholesaleResult<CompanyMember> {
        if self.get(shop, id).await?.is_none() {
            return Err(DbError::not_found(ENTITY, id.to_string()).into());
        }

        let new_id = Uuid::new_v4();
        let query = format!(
            "BEGIN TRANSACTION; \
             DELETE type::record('company_member', $old_id) WHERE shop = $shop; \
             {CREATE_MEMBER}; \
             COMMIT TRANSACTION;"
        );

        self.db
            .query(query)
            .bind(("old_id", id.to_string()))
            .bind(("id", new_id.to_string()))
            .bind(("shop", shop.to_string()))
            .bind(("location_id", input.location_id.to_string()))
            .bind(("contact_id", input.contact_id))
            .bind(("role_id", input.role_id))
            .bind(("role_assignment_id", input.role_assignment_id))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("title", input.title))
            .bind(("email", input.email))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        self.get(shop, new_id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, new_id.to_string()).into())
    }

    async fn list_by_location(
        &self,
        shop: &str,
        location_id: Uuid,
    ) -> WholesaleResult<Vec<CompanyMember>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM company_member \
                 WHERE shop = $shop AND location_id = $location_id \
                 ORDER BY created_at ASC",
            )
            .bind(("shop", shop.to_string()))
            .bind(("location_id", location_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(MemberRow::try_into_member)
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
