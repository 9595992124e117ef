//! The four provisioning pipelines.
//!
//! Each pipeline is an `impl` block on [`ProvisioningService`] so they
//! share the injected gateway and mirror store. Steps run strictly in
//! sequence: later steps need identifiers returned by earlier ones.

mod apply;
mod approve;
mod listing;
mod location;
mod members;

pub use apply::{ApplicationOutcome, CompanySnapshot, ExistingCompany};
pub use approve::ApprovalOutcome;
pub use listing::{CompanyLocations, CompanyRef, LocationSummary, TeamMember, TeamPage};
pub use location::{LocationOutcome, LocationUpdateOutcome};
pub use members::{EditOutcome, InviteOutcome};

use wholesale_core::error::{WholesaleError, WholesaleResult};
use wholesale_platform::PlatformGateway;
use wholesale_platform::payload::{ContactRole, RoleAssignment};

use crate::remote::Remote;
use crate::roles;
use crate::saga::{Saga, Step, StepError};

/// The caller's company contact id and company id, taken from their
/// first company profile.
async fn caller_company<G: PlatformGateway>(
    saga: &mut Saga,
    remote: &Remote<'_, G>,
    caller_id: &str,
) -> WholesaleResult<(String, String)> {
    let profiles = saga.require(
        Step::ResolveCallerCompany,
        remote.customer_profiles(caller_id).await,
    )?;
    profiles
        .first_company()
        .map(|(contact_id, company)| (contact_id.to_string(), company.id.clone()))
        .ok_or_else(|| WholesaleError::Validation {
            message: "Missing companyId".into(),
        })
}

/// Fetch the company's roles and pick the one `label` names.
async fn find_role<G: PlatformGateway>(
    remote: &Remote<'_, G>,
    company_id: &str,
    label: &str,
) -> Result<Option<ContactRole>, StepError> {
    let available = remote.contact_roles(company_id).await?;
    Ok(roles::resolve_role(label, &available).cloned())
}

/// Resolve `label` and assign it on `location_id`, turning every failure
/// into a warning. An unresolved label is not an error: the contact is
/// simply left without a role.
async fn assign_role_best_effort<G: PlatformGateway>(
    saga: &mut Saga,
    remote: &Remote<'_, G>,
    company_id: &str,
    contact_id: &str,
    label: &str,
    location_id: &str,
) -> Option<(ContactRole, RoleAssignment)> {
    let role = match saga.tolerate(Step::FetchRoles, find_role(remote, company_id, label).await)? {
        Some(role) => role,
        None => {
            saga.warn(Step::ResolveRole, format!("No role matches '{label}'"));
            return None;
        }
    };
    let assignment = saga.tolerate(
        Step::AssignRole,
        remote.assign_role(contact_id, &role.id, location_id).await,
    )?;
    Some((role, assignment))
}
