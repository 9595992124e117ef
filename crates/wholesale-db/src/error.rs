//! Database-specific error types and conversions.

use wholesale_core::error::WholesaleError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    /// A unique index rejected the write.
    #[error("Duplicate {entity}")]
    Conflict { entity: String },

    /// A stored value could not be decoded into its domain type.
    #[error("Corrupt {entity} row: {detail}")]
    Corrupt { entity: String, detail: String },

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classify a failed statement. Unique index violations become
    /// [`DbError::Conflict`]; everything else is a plain query failure.
    pub(crate) fn statement(entity: &str, err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") || message.contains("already exists") {
            DbError::Conflict {
                entity: entity.to_string(),
            }
        } else {
            DbError::Query(message)
        }
    }

    pub(crate) fn corrupt(entity: &str, detail: impl std::fmt::Display) -> Self {
        DbError::Corrupt {
            entity: entity.to_string(),
            detail: detail.to_string(),
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }
}

impl From<DbError> for WholesaleError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => WholesaleError::NotFound { entity, id },
            DbError::Conflict { entity } => WholesaleError::AlreadyExists { entity },
            other => WholesaleError::Database(other.to_string()),
        }
    }
}

/// Parse a UUID stored as a string.
pub(crate) fn parse_uuid(entity: &str, raw: &str) -> Result<uuid::Uuid, DbError> {
    uuid::Uuid::parse_str(raw).map_err(|e| DbError::corrupt(entity, format!("invalid UUID {raw}: {e}")))
}
