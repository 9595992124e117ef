//! Per-shop settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSettings {
    pub shop: String,
    /// Provision applications on the platform without admin review.
    pub auto_approval: bool,
}
