//! SurrealDB implementation of [`PresetRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wholesale_core::error::WholesaleResult;
use wholesale_core::models::preset::{CreatePreset, Preset};
use wholesale_core::repository::PresetRepository;

use crate::error::{DbError, parse_uuid};

const ENTITY: &str = "preset";

#[derive(Debug, SurrealValue)]
struct PresetRow {
    record_id: String,
    shop: String,
    title: String,
    is_default: bool,
    payment_terms_template_id: Option<String>,
    submit_orders_as_draft: bool,
    tax_exempt: bool,
    contact_role: String,
    note: String,
    deposit_percentage: Option<f64>,
    editable_shipping_address: bool,
    created_at: DateTime<Utc>,
}

impl PresetRow {
    fn try_into_preset(self) -> Result<Preset, DbError> {
        Ok(Preset {
            id: parse_uuid(ENTITY, &self.record_id)?,
            shop: self.shop,
            title: self.title,
            is_default: self.is_default,
            payment_terms_template_id: self.payment_terms_template_id,
            submit_orders_as_draft: self.submit_orders_as_draft,
            tax_exempt: self.tax_exempt,
            contact_role: self.contact_role,
            note: self.note,
            deposit_percentage: self.deposit_percentage,
            editable_shipping_address: self.editable_shipping_address,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Preset repository.
#[derive(Clone)]
pub struct SurrealPresetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPresetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PresetRepository for SurrealPresetRepository<C> {
    async fn create(&self, input: CreatePreset) -> WholesaleResult<Preset> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('preset', $id) SET \
                 shop = $shop, title = $title, is_default = $is_default, \
                 payment_terms_template_id = $payment_terms_template_id, \
                 submit_orders_as_draft = $submit_orders_as_draft, \
                 tax_exempt = $tax_exempt, contact_role = $contact_role, \
                 note = $note, deposit_percentage = $deposit_percentage, \
                 editable_shipping_address = $editable_shipping_address; \
                 SELECT meta::id(id) AS record_id, * \
                 FROM type::record('preset', $id);",
            )
            .bind(("id", id_str.clone()))
            .bind(("shop", input.shop))
            .bind(("title", input.title))
            .bind(("is_default", input.is_default))
            .bind(("payment_terms_template_id", input.payment_terms_template_id))
            .bind(("submit_orders_as_draft", input.submit_orders_as_draft))
            .bind(("tax_exempt", input.tax_exempt))
            .bind(("contact_role", input.contact_role))
            .bind(("note", input.note))
            .bind(("deposit_percentage", input.deposit_percentage))
            .bind(("editable_shipping_address", input.editable_shipping_address))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::statement(ENTITY, e))?;

        // Statement 0 is the CREATE, statement 1 reads it back with its id.
        let rows: Vec<PresetRow> = result.take(1).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found(ENTITY, id_str))?;
        Ok(row.try_into_preset()?)
    }

    async fn find_default(&self, shop: &str) -> WholesaleResult<Option<Preset>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM preset \
                 WHERE shop = $shop AND is_default = true \
                 ORDER BY created_at ASC LIMIT 1",
            )
            .bind(("shop", shop.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PresetRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(PresetRow::try_into_preset)
            .transpose()?)
    }
}
