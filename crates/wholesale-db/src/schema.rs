//! Mirror schema and the forward-only steps that build it.
//!
//! All tables are SCHEMAFULL and every mirror table carries the owning
//! `shop`. UUIDs are stored as strings. Address snapshots are stored as
//! flexible objects on the owning row rather than in their own table.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Version ledger
// -----------------------------------------------------------------------

const LEDGER_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS schema_version SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE schema_version TYPE int;
DEFINE FIELD IF NOT EXISTS label ON TABLE schema_version TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE schema_version TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_schema_version ON TABLE schema_version \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct AppliedVersion {
    version: u32,
}

/// One forward-only schema change. Versions are applied in order and
/// never edited once released.
struct SchemaStep {
    version: u32,
    label: &'static str,
    ddl: &'static str,
}

static SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        label: "initial_schema",
        ddl: SCHEMA_V1,
    },
    SchemaStep {
        version: 2,
        label: "lookup_indexes",
        ddl: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1: installation and mirror tables
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenant sessions (one per installed shop)
-- =======================================================================
DEFINE TABLE tenant_session SCHEMAFULL;
DEFINE FIELD shop ON TABLE tenant_session TYPE string;
DEFINE FIELD access_token ON TABLE tenant_session TYPE option<string>;
DEFINE FIELD api_key ON TABLE tenant_session TYPE option<string>;
DEFINE FIELD created_at ON TABLE tenant_session TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant_session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_session_shop ON TABLE tenant_session \
    COLUMNS shop UNIQUE;

-- =======================================================================
-- Tenant settings (record id is the shop domain)
-- =======================================================================
DEFINE TABLE tenant_settings SCHEMAFULL;
DEFINE FIELD shop ON TABLE tenant_settings TYPE string;
DEFINE FIELD auto_approval ON TABLE tenant_settings TYPE bool \
    DEFAULT false;
DEFINE INDEX idx_tenant_settings_shop ON TABLE tenant_settings \
    COLUMNS shop UNIQUE;

-- =======================================================================
-- Presets (shop scope)
-- =======================================================================
DEFINE TABLE preset SCHEMAFULL;
DEFINE FIELD shop ON TABLE preset TYPE string;
DEFINE FIELD title ON TABLE preset TYPE string;
DEFINE FIELD is_default ON TABLE preset TYPE bool DEFAULT false;
DEFINE FIELD payment_terms_template_id ON TABLE preset \
    TYPE option<string>;
DEFINE FIELD submit_orders_as_draft ON TABLE preset TYPE bool;
DEFINE FIELD tax_exempt ON TABLE preset TYPE bool;
DEFINE FIELD contact_role ON TABLE preset TYPE string;
DEFINE FIELD note ON TABLE preset TYPE string DEFAULT '';
DEFINE FIELD deposit_percentage ON TABLE preset TYPE option<float>;
DEFINE FIELD editable_shipping_address ON TABLE preset TYPE bool;
DEFINE FIELD created_at ON TABLE preset TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Companies (shop scope)
-- =======================================================================
DEFINE TABLE company SCHEMAFULL;
DEFINE FIELD shop ON TABLE company TYPE string;
DEFINE FIELD contact_id ON TABLE company TYPE option<string>;
DEFINE FIELD email ON TABLE company TYPE string;
DEFINE FIELD name ON TABLE company TYPE string;
DEFINE FIELD external_id ON TABLE company TYPE option<string>;
DEFINE FIELD status ON TABLE company TYPE string \
    ASSERT $value IN ['pending', 'approved', 'autoApprove'];
DEFINE FIELD authorized ON TABLE company TYPE bool DEFAULT false;
DEFINE FIELD remote_company_id ON TABLE company TYPE option<string>;
DEFINE FIELD shipping ON TABLE company TYPE option<object> FLEXIBLE;
DEFINE FIELD billing ON TABLE company TYPE option<object> FLEXIBLE;
DEFINE FIELD applicant_first_name ON TABLE company TYPE option<string>;
DEFINE FIELD applicant_last_name ON TABLE company TYPE option<string>;
DEFINE FIELD applicant_job_title ON TABLE company TYPE option<string>;
DEFINE FIELD created_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_company_shop_email ON TABLE company \
    COLUMNS shop, email UNIQUE;

-- =======================================================================
-- Company contacts (shop scope, keyed by platform customer id)
-- =======================================================================
DEFINE TABLE company_contact SCHEMAFULL;
DEFINE FIELD shop ON TABLE company_contact TYPE string;
DEFINE FIELD remote_customer_id ON TABLE company_contact TYPE string;
DEFINE FIELD remote_contact_id ON TABLE company_contact \
    TYPE option<string>;
DEFINE FIELD name ON TABLE company_contact TYPE option<string>;
DEFINE FIELD email ON TABLE company_contact TYPE option<string>;
DEFINE FIELD approved ON TABLE company_contact TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE company_contact TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_company_contact_customer ON TABLE company_contact \
    COLUMNS shop, remote_customer_id UNIQUE;

-- =======================================================================
-- Locations (shop scope, under a company)
-- =======================================================================
DEFINE TABLE location SCHEMAFULL;
DEFINE FIELD shop ON TABLE location TYPE string;
DEFINE FIELD company_id ON TABLE location TYPE string;
DEFINE FIELD remote_location_id ON TABLE location TYPE string;
DEFINE FIELD name ON TABLE location TYPE string;
DEFINE FIELD shipping ON TABLE location TYPE option<object> FLEXIBLE;
DEFINE FIELD billing ON TABLE location TYPE option<object> FLEXIBLE;
DEFINE FIELD is_default_shipping ON TABLE location TYPE bool \
    DEFAULT false;
DEFINE FIELD is_default_billing ON TABLE location TYPE bool \
    DEFAULT false;
DEFINE FIELD created_at ON TABLE location TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_location_remote_id ON TABLE location \
    COLUMNS shop, remote_location_id UNIQUE;

-- =======================================================================
-- Company members (shop scope, cache of remote role assignments)
-- =======================================================================
DEFINE TABLE company_member SCHEMAFULL;
DEFINE FIELD shop ON TABLE company_member TYPE string;
DEFINE FIELD location_id ON TABLE company_member TYPE string;
DEFINE FIELD contact_id ON TABLE company_member TYPE string;
DEFINE FIELD role_id ON TABLE company_member TYPE option<string>;
DEFINE FIELD role_assignment_id ON TABLE company_member \
    TYPE option<string>;
DEFINE FIELD first_name ON TABLE company_member TYPE option<string>;
DEFINE FIELD last_name ON TABLE company_member TYPE option<string>;
DEFINE FIELD title ON TABLE company_member TYPE option<string>;
DEFINE FIELD email ON TABLE company_member TYPE option<string>;
DEFINE FIELD created_at ON TABLE company_member TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE company_member TYPE datetime \
    DEFAULT time::now();
";

// -----------------------------------------------------------------------
// Schema v2: secondary lookup indexes
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE INDEX idx_company_shop_remote ON TABLE company \
    COLUMNS shop, remote_company_id;
DEFINE INDEX idx_company_shop_contact ON TABLE company \
    COLUMNS shop, contact_id;
DEFINE INDEX idx_location_company ON TABLE location \
    COLUMNS shop, company_id;
DEFINE INDEX idx_member_contact ON TABLE company_member \
    COLUMNS shop, contact_id;
DEFINE INDEX idx_member_location ON TABLE company_member \
    COLUMNS shop, location_id;
DEFINE INDEX idx_preset_default ON TABLE preset \
    COLUMNS shop, is_default;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Bring the mirror schema up to date.
///
/// Reads the highest version in `schema_version` and applies every
/// newer step. Each step and its ledger row commit together, so a
/// failed step is retried on the next start.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(LEDGER_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("schema_version ledger: {e}")))?;

    let applied: Vec<AppliedVersion> = db
        .query("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
        .await?
        .take(0)?;
    let applied = applied.first().map_or(0, |row| row.version);

    let pending = SCHEMA_STEPS.iter().filter(|step| step.version > applied);
    for step in pending {
        let script = format!(
            "BEGIN TRANSACTION;\n{}\nCREATE schema_version SET version = $version, label = $label;\nCOMMIT TRANSACTION;",
            step.ddl
        );
        db.query(script)
            .bind(("version", step.version))
            .bind(("label", step.label))
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("v{} {}: {e}", step.version, step.label)))?;
        info!(version = step.version, label = step.label, "Schema step applied");
    }

    Ok(())
}

/// Raw DDL of the initial schema, for tests that bypass the runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_steps_count_up_from_one() {
        for (i, step) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, i + 1, "{} is out of sequence", step.label);
        }
    }

    #[test]
    fn every_mirror_table_is_scoped_by_shop() {
        for table in [
            "tenant_session",
            "tenant_settings",
            "preset",
            "company",
            "company_contact",
            "location",
            "company_member",
        ] {
            let field = format!("DEFINE FIELD shop ON TABLE {table} TYPE string;");
            assert!(SCHEMA_V1.contains(&field), "{table} has no shop field");
        }
    }
}
