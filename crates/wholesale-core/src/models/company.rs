//! Company domain model and its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::Address;

/// Lifecycle of a company application.
///
/// Every application starts as `Pending`. A pending company either gets
/// approved by an admin (`Approved`) or, when the shop auto-approves,
/// lands directly in `AutoApprove`. Both end states are terminal and
/// grant the same access; they are kept apart so the admin UI can tell
/// reviewed companies from unreviewed ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CompanyStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "autoApprove")]
    AutoApprove,
}

impl CompanyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CompanyStatus::Pending => "pending",
            CompanyStatus::Approved => "approved",
            CompanyStatus::AutoApprove => "autoApprove",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" | "open" => Some(CompanyStatus::Pending),
            "approved" => Some(CompanyStatus::Approved),
            "autoApprove" => Some(CompanyStatus::AutoApprove),
            _ => None,
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: CompanyStatus) -> bool {
        matches!(
            (self, next),
            (CompanyStatus::Pending, CompanyStatus::Approved)
                | (CompanyStatus::Pending, CompanyStatus::AutoApprove)
        )
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, CompanyStatus::Pending)
    }

    /// Statuses a company row may be inserted with.
    pub fn is_initial(self) -> bool {
        matches!(self, CompanyStatus::Pending | CompanyStatus::AutoApprove)
    }
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applicant's contact details captured on the application form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
}

/// A business customer of one shop, mirrored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    /// Shop domain that owns the company.
    pub shop: String,
    /// Local company contact that applied for the account.
    pub contact_id: Option<Uuid>,
    /// Applicant email; unique per shop.
    pub email: String,
    pub name: String,
    pub external_id: Option<String>,
    pub status: CompanyStatus,
    /// Whether the applicant already has a linked platform identity.
    pub authorized: bool,
    /// Platform company id, written once when the remote company exists.
    pub remote_company_id: Option<String>,
    pub shipping: Option<Address>,
    pub billing: Option<Address>,
    pub applicant: ApplicantContact,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a company mirror row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub shop: String,
    pub contact_id: Option<Uuid>,
    pub email: String,
    pub name: String,
    pub external_id: Option<String>,
    pub status: CompanyStatus,
    pub authorized: bool,
    pub remote_company_id: Option<String>,
    pub shipping: Option<Address>,
    pub billing: Option<Address>,
    pub applicant: ApplicantContact,
}
