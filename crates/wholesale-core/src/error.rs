//! Error types for the wholesale provisioning system.

use thiserror::Error;

/// A single business validation error returned by the commerce platform
/// inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RemoteUserError {
    /// Path of the offending input field, when the platform reports one.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Error)]
pub enum WholesaleError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("No usable platform credential stored for shop {shop}")]
    TenantCredentialMissing { shop: String },

    /// A creation step was rejected by the platform. Nothing was written.
    #[error("{step} rejected by platform: {}", join_messages(.errors))]
    RemoteRejected {
        step: String,
        errors: Vec<RemoteUserError>,
    },

    /// A location was created remotely but the location-admin role could
    /// not be assigned on it.
    #[error("Location {location_id} created but role assignment failed: {}", join_messages(.errors))]
    RoleAssignmentFailed {
        location_id: String,
        errors: Vec<RemoteUserError>,
    },

    #[error("Platform request failed: {0}")]
    RemoteTransport(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_messages(errors: &[RemoteUserError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type WholesaleResult<T> = Result<T, WholesaleError>;
