//! Company contact domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A platform customer acting as a company contact.
///
/// Keyed by the platform's opaque customer id. The platform-side
/// company contact id is only known once the customer has been
/// assigned to a remote company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyContact {
    pub id: Uuid,
    pub shop: String,
    pub remote_customer_id: String,
    pub remote_contact_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// True once the owning company exists on the platform.
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyContact {
    /// Pre-allocated id, so a company row can reference the contact
    /// before the contact row is written.
    pub id: Option<Uuid>,
    pub shop: String,
    pub remote_customer_id: String,
    pub remote_contact_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub approved: bool,
}
