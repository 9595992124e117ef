//! Approval preset domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAYMENT_TERMS_TEMPLATE: &str = "gid://shopify/PaymentTermsTemplate/2";
pub const DEFAULT_CONTACT_ROLE: &str = "location-admin";

/// A named bundle of business rules applied when a company is
/// provisioned on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: Uuid,
    pub shop: String,
    pub title: String,
    pub is_default: bool,
    pub payment_terms_template_id: Option<String>,
    /// Orders are submitted as drafts for merchant review.
    pub submit_orders_as_draft: bool,
    pub tax_exempt: bool,
    /// Permission label given to the applying contact.
    pub contact_role: String,
    /// Note attached to the remote company.
    pub note: String,
    /// Deposit percentage required at checkout.
    pub deposit_percentage: Option<f64>,
    /// Buyers may ship to one-off addresses.
    pub editable_shipping_address: bool,
    pub created_at: DateTime<Utc>,
}

impl Preset {
    /// Defaults used when a shop never configured a preset.
    pub fn builtin(shop: &str) -> Self {
        Self {
            id: Uuid::nil(),
            shop: shop.to_string(),
            title: "Default preset".into(),
            is_default: true,
            payment_terms_template_id: Some(DEFAULT_PAYMENT_TERMS_TEMPLATE.into()),
            submit_orders_as_draft: true,
            tax_exempt: true,
            contact_role: DEFAULT_CONTACT_ROLE.into(),
            note: String::new(),
            deposit_percentage: None,
            editable_shipping_address: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePreset {
    pub shop: String,
    pub title: String,
    pub is_default: bool,
    pub payment_terms_template_id: Option<String>,
    pub submit_orders_as_draft: bool,
    pub tax_exempt: bool,
    pub contact_role: String,
    pub note: String,
    pub deposit_percentage: Option<f64>,
    pub editable_shipping_address: bool,
}
