//! Location domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::Address;

/// A shipping/billing location of a company.
///
/// Only ever created after the platform confirmed the location, so
/// `remote_location_id` is always set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub shop: String,
    pub company_id: Uuid,
    pub remote_location_id: String,
    pub name: String,
    pub shipping: Option<Address>,
    pub billing: Option<Address>,
    pub is_default_shipping: bool,
    pub is_default_billing: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocation {
    pub shop: String,
    pub company_id: Uuid,
    pub remote_location_id: String,
    pub name: String,
    pub shipping: Option<Address>,
    pub billing: Option<Address>,
    pub is_default_shipping: bool,
    pub is_default_billing: bool,
}

/// Fields of a mirrored location that an edit may change. `None` keeps
/// the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLocation {
    pub name: Option<String>,
    pub shipping: Option<Address>,
    pub billing: Option<Address>,
}
