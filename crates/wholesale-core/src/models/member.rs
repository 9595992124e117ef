//! Company member domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Local cache of one (contact, location, role) assignment.
///
/// The platform is authoritative for role assignments; this row exists
/// for display and edit pre-fill and is replaced whenever the role
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyMember {
    pub id: Uuid,
    pub shop: String,
    pub location_id: Uuid,
    /// Platform company contact id.
    pub contact_id: String,
    pub role_id: Option<String>,
    pub role_assignment_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyMember {
    pub shop: String,
    pub location_id: Uuid,
    pub contact_id: String,
    pub role_id: Option<String>,
    pub role_assignment_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
}
