//! SurrealDB implementation of [`CompanyRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wholesale_core::error::{WholesaleError, WholesaleResult};
use wholesale_core::models::address::Address;
use wholesale_core::models::company::{ApplicantContact, Company, CompanyStatus, CreateCompany};
use wholesale_core::repository::{CompanyRepository, PaginatedResult, Pagination};

use crate::error::{DbError, parse_uuid};

const ENTITY: &str = "company";

/// Company row including the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CompanyRow {
    record_id: String,
    shop: String,
    contact_id: Option<String>,
    email: String,
    name: String,
    external_id: Option<String>,
    status: String,
    authorized: bool,
    remote_company_id: Option<String>,
    shipping: Option<serde_json::Value>,
    billing: Option<serde_json::Value>,
    applicant_first_name: Option<String>,
    applicant_last_name: Option<String>,
    applicant_job_title: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    fn try_into_company(self) -> Result<Company, DbError> {
        let id = parse_uuid(ENTITY, &self.record_id)?;
        let contact_id = self
            .contact_id
            .as_deref()
            .map(|raw| parse_uuid(ENTITY, raw))
            .transpose()?;
        let status = CompanyStatus::parse(&self.status)
            .ok_or_else(|| DbError::corrupt(ENTITY, format!("unknown status {}", self.status)))?;
        Ok(Company {
            id,
            shop: self.shop,
            contact_id,
            email: self.email,
            name: self.name,
            external_id: self.external_id,
            status,
            authorized: self.authorized,
            remote_company_id: self.remote_company_id,
            shipping: self.shipping.as_ref().and_then(Address::from_json),
            billing: self.billing.as_ref().and_then(Address::from_json),
            applicant: ApplicantContact {
                first_name: self.applicant_first_name,
                last_name: self.applicant_last_name,
                job_title: self.applicant_job_title,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

const SELECT_COMPANY: &str = "SELECT meta::id(id) AS record_id, * FROM company";

/// SurrealDB implementation of the Company repository.
#[derive(Clone)]
pub struct SurrealCompanyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCompanyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn find_one(
        &self,
        filter: &str,
        shop: &str,
        key: &'static str,
        value: String,
    ) -> WholesaleResult<Option<Company>> {
        let mut result = self
            .db
            .query(format!(
                "{SELECT_COMPANY} WHERE shop = $shop AND {filter} \
                 ORDER BY created_at ASC LIMIT 1"
            ))
            .bind(("shop", shop.to_string()))
            .bind((key, value))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(CompanyRow::try_into_company)
            .transpose()?)
    }
}

impl<C: Connection> CompanyRepository for SurrealCompanyRepository<C> {
    async fn create(&self, input: CreateCompany) -> WholesaleResult<Company> {
        if !input.status.is_initial() {
            return Err(WholesaleError::InvalidTransition {
                from: "none".into(),
                to: input.status.to_string(),
            });
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('company', $id) SET \
                 shop = $shop, contact_id = $contact_id, \
                 email = $email, name = $name, \
                 external_id = $external_id, status = $status, \
                 authorized = $authorized, \
                 remote_company_id = $remote_company_id, \
                 shipping = $shipping, billing = $billing, \
                 applicant_first_name = $first_name, \
                 applicant_last_name = $last_name, \
                 applicant_job_title = $job_title",
            )
            .bind(("id", id_str.clone()))
            .bind(("shop", input.shop.clone()))
            .bind(("contact_id", input.contact_id.map(|c| c.to_string())))
            .bind(("email", input.email))
            .bind(("name", input.name))
            .bind(("external_id", input.external_id))
            .bind(("status", input.status.as_str()))
            .bind(("authorized", input.authorized))
            .bind(("remote_company_id", input.remote_company_id))
            .bind(("shipping", input.shipping.as_ref().map(Address::to_json)))
            .bind(("billing", input.billing.as_ref().map(Address::to_json)))
            .bind(("first_name", input.applicant.first_name))
            .bind(("last_name", input.applicant.last_name))
            .bind(("job_title", input.applicant.job_title))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(|e| DbError::statement(ENTITY, e))?;

        self.get_by_id(&input.shop, id).await
    }

    async fn get_by_id(&self, shop: &str, id: Uuid) -> WholesaleResult<Company> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('company', $id) WHERE shop = $shop",
            )
            .bind(("id", id_str.clone()))
            .bind(("shop", shop.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, id_str))?;

        Ok(row.try_into_company()?)
    }

    async fn find_by_contact(&self, shop: &str, contact_id: Uuid) -> WholesaleResult<Option<Company>> {
        self.find_one("contact_id = $contact_id", shop, "contact_id", contact_id.to_string())
            .await
    }

    async fn find_by_email(&self, shop: &str, email: &str) -> WholesaleResult<Option<Company>> {
        self.find_one("email = $email", shop, "email", email.to_string())
            .await
    }

    async fn find_by_remote_id(
        &self,
        shop: &str,
        remote_company_id: &str,
    ) -> WholesaleResult<Option<Company>> {
        self.find_one(
            "remote_company_id = $remote_company_id",
            shop,
            "remote_company_id",
            remote_company_id.to_string(),
        )
        .await
    }

    async fn mark_approved(
        &self,
        shop: &str,
        id: Uuid,
        remote_company_id: &str,
    ) -> WholesaleResult<Company> {
        let current = self.get_by_id(shop, id).await?;
        if !current.status.can_transition_to(CompanyStatus::Approved)
            || current.remote_company_id.is_some()
        {
            return Err(WholesaleError::InvalidTransition {
                from: current.status.to_string(),
                to: CompanyStatus::Approved.to_string(),
            });
        }

        // The WHERE clause re-checks the guard so a concurrent approval
        // cannot stamp a second remote id.
        let result = self
            .db
            .query(
                "UPDATE type::record('company', $id) SET \
                 status = 'approved', \
                 remote_company_id = $remote_company_id, \
                 authorized = true, \
                 updated_at = time::now() \
                 WHERE shop = $shop AND status = 'pending' \
                 AND remote_company_id = NONE",
            )
            .bind(("id", id.to_string()))
            .bind(("shop", shop.to_string()))
            .bind(("remote_company_id", remote_company_id.to_string()))
            .await
            .map_err(DbError::from)?;
        result.check().map_err(|e| DbError::statement(ENTITY, e))?;

        let updated = self.get_by_id(shop, id).await?;
        if updated.remote_company_id.as_deref() != Some(remote_company_id) {
            return Err(WholesaleError::InvalidTransition {
                from: updated.status.to_string(),
                to: CompanyStatus::Approved.to_string(),
            });
        }
        Ok(updated)
    }

    async fn delete(&self, shop: &str, id: Uuid) -> WholesaleResult<()> {
        self.db
            .query("DELETE type::record('company', $id) WHERE shop = $shop")
            .bind(("id", id.to_string()))
            .bind(("shop", shop.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::statement(ENTITY, e))?;

        Ok(())
    }

    async fn list(
        &self,
        shop: &str,
        pagination: Pagination,
    ) -> WholesaleResult<PaginatedResult<Company>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM company WHERE shop = $shop GROUP ALL")
            .bind(("shop", shop.to_string()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(format!(
                "{SELECT_COMPANY} WHERE shop = $shop \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset"
            ))
            .bind(("shop", shop.to_string()))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(CompanyRow::try_into_company)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
