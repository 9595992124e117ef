//! Tenant session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored app installation for one shop.
///
/// Created at install time and mutated when the access token rotates.
#[derive(Clone, Serialize, Deserialize)]
pub struct TenantSession {
    pub id: Uuid,
    /// Shop domain, e.g. `acme.myshopify.com`.
    pub shop: String,
    /// Credential used to call the platform on the shop's behalf.
    pub access_token: Option<String>,
    /// App-issued key for callers without a session token.
    pub api_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for TenantSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantSession")
            .field("id", &self.id)
            .field("shop", &self.shop)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenantSession {
    pub shop: String,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
}
