//! Address snapshot stored on companies and locations.

use serde::{Deserialize, Serialize};

/// A postal address as submitted by the applicant.
///
/// Stored as a structured snapshot on the owning record rather than
/// normalized into its own table. `province` holds the zone code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub zip: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
}

impl Address {
    /// True when the fields a platform location needs are present.
    pub fn is_deliverable(&self) -> bool {
        fn filled(v: &Option<String>) -> bool {
            v.as_deref().is_some_and(|s| !s.trim().is_empty())
        }
        filled(&self.address1) && filled(&self.country_code)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Decode a stored snapshot; null or unreadable snapshots yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deliverable_requires_street_and_country() {
        let mut addr = Address {
            address1: Some("1 Main St".into()),
            ..Default::default()
        };
        assert!(!addr.is_deliverable());
        addr.country_code = Some("  ".into());
        assert!(!addr.is_deliverable());
        addr.country_code = Some("IN".into());
        assert!(addr.is_deliverable());
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let addr = Address {
            first_name: Some("Ada".into()),
            country_code: Some("GB".into()),
            ..Default::default()
        };
        let json = addr.to_json();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["countryCode"], "GB");
        assert_eq!(Address::from_json(&json), Some(addr));
        assert_eq!(Address::from_json(&serde_json::Value::Null), None);
    }
}
