//! Pipeline C: a company contact adds or edits a location from the
//! storefront.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use wholesale_core::error::{RemoteUserError, WholesaleError, WholesaleResult};
use wholesale_core::models::location::{CreateLocation, UpdateLocation};
use wholesale_core::models::member::CreateCompanyMember;
use wholesale_core::models::preset::DEFAULT_CONTACT_ROLE;
use wholesale_core::repository::{
    CompanyRepository, LocationRepository, MemberRepository, MirrorStore,
};
use wholesale_platform::PlatformGateway;
use wholesale_platform::payload::{ContactRole, RoleAssignment};

use super::{caller_company, find_role};
use crate::input::{LocationUpdateInput, NewLocationInput};
use crate::remote::Remote;
use crate::saga::{Policy, Saga, SagaWarning, Step, StepError, StepOutcome};
use crate::service::ProvisioningService;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOutcome {
    pub remote_location_id: String,
    pub location_id: Option<Uuid>,
    pub role_assignment_id: Option<String>,
    pub warnings: Vec<SagaWarning>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdateOutcome {
    pub remote_location_id: String,
    pub name: String,
    /// False when the local row could not be updated.
    pub mirrored: bool,
    pub warnings: Vec<SagaWarning>,
}

const SHIPPING: &str = "SHIPPING";
const BILLING: &str = "BILLING";

impl<G: PlatformGateway, M: MirrorStore> ProvisioningService<G, M> {
    /// Create a location under the caller's company and make the caller
    /// its location admin.
    ///
    /// The location is mirrored even when the role step fails, since it
    /// exists on the platform. That failure is still returned as
    /// [`WholesaleError::RoleAssignmentFailed`] so the role can be fixed
    /// by hand.
    pub async fn create_location(
        &self,
        shop: &str,
        caller_id: &str,
        input: NewLocationInput,
    ) -> WholesaleResult<LocationOutcome> {
        let mut saga = Saga::new("create_location", shop);
        saga.require(Step::ValidateInput, input.validate().map_err(StepError::from))?;

        // 1. Which company does the caller act for?
        let ctx = self.tenant(shop).await?;
        let remote = Remote::new(&self.gateway, &ctx);
        let (contact_id, company_id) = caller_company(&mut saga, &remote, caller_id).await?;

        // 2. Create the remote location.
        let location = saga.require(
            Step::CreateLocation,
            remote.create_location(&company_id, input.to_variables()).await,
        )?;

        // 3. Location admin role for the caller.
        let role_result =
            location_admin(&remote, &company_id, &contact_id, &location.id).await;
        let role = saga.record(Step::AssignRole, Policy::WarnOnFailure, role_result);

        // 4. Mirror the location, then the member if a role was given.
        let local_company = self
            .store
            .companies()
            .find_by_remote_id(shop, &company_id)
            .await;
        let location_row = match saga.tolerate(Step::MirrorWrite, local_company.map_err(StepError::from)) {
            Some(Some(company)) => {
                let created = self
                    .store
                    .locations()
                    .create(CreateLocation {
                        shop: shop.to_string(),
                        company_id: company.id,
                        remote_location_id: location.id.clone(),
                        name: location
                            .name
                            .clone()
                            .unwrap_or_else(|| input.name.trim().to_string()),
                        shipping: Some(input.shipping_address.clone()),
                        billing: Some(input.billing().clone()),
                        is_default_shipping: input.is_shipping.unwrap_or(false),
                        is_default_billing: input.is_billing.unwrap_or(false),
                    })
                    .await;
                saga.tolerate(Step::MirrorWrite, created.map_err(StepError::from))
            }
            Some(None) => {
                saga.warn(Step::MirrorWrite, format!("Company {company_id} is not mirrored locally"));
                None
            }
            None => None,
        };
        if let (Some(row), StepOutcome::Succeeded((role, assignment))) = (&location_row, &role) {
            let created = self
                .store
                .members()
                .create(CreateCompanyMember {
                    shop: shop.to_string(),
                    location_id: row.id,
                    contact_id: contact_id.clone(),
                    role_id: Some(role.id.clone()),
                    role_assignment_id: Some(assignment.id.clone()),
                    first_name: None,
                    last_name: None,
                    title: None,
                    email: None,
                })
                .await;
            saga.tolerate(Step::MirrorWrite, created.map_err(StepError::from));
        }

        match role {
            StepOutcome::Succeeded((_, assignment)) => {
                info!(shop, location_id = %location.id, "Location created");
                Ok(LocationOutcome {
                    remote_location_id: location.id,
                    location_id: location_row.map(|l| l.id),
                    role_assignment_id: Some(assignment.id),
                    warnings: saga.finish(),
                })
            }
            StepOutcome::Partial(warning) => {
                saga.finish();
                let errors = if warning.user_errors.is_empty() {
                    vec![RemoteUserError {
                        field: None,
                        message: warning.message,
                        code: None,
                    }]
                } else {
                    warning.user_errors
                };
                Err(WholesaleError::RoleAssignmentFailed {
                    location_id: location.id,
                    errors,
                })
            }
            StepOutcome::Fatal(err) => Err(err),
        }
    }

    /// Rename a location of the caller's company and set its addresses.
    ///
    /// The rename and every address assignment are required. With
    /// billing equal to shipping one assignment covers both address
    /// types; otherwise shipping is assigned before billing. The local
    /// row follows on a best-effort basis.
    pub async fn update_location(
        &self,
        shop: &str,
        caller_id: &str,
        input: LocationUpdateInput,
    ) -> WholesaleResult<LocationUpdateOutcome> {
        let mut saga = Saga::new("update_location", shop);
        saga.require(Step::ValidateInput, input.validate().map_err(StepError::from))?;
        let location_id = input.location_id.trim();

        let ctx = self.tenant(shop).await?;
        let remote = Remote::new(&self.gateway, &ctx);

        // 1. Only the caller's own company's locations.
        let (_, company_id) = caller_company(&mut saga, &remote, caller_id).await?;
        let owner = saga.require(
            Step::CheckOwnership,
            remote.location_owner(location_id).await,
        )?;
        let owned = owner
            .as_ref()
            .and_then(|l| l.company.as_ref())
            .is_some_and(|company| company.id == company_id);
        if !owned {
            return Err(WholesaleError::NotFound {
                entity: "company_location".into(),
                id: location_id.to_string(),
            });
        }

        // 2. Rename.
        let updated = saga.require(
            Step::UpdateLocation,
            remote.update_location(location_id, input.to_variables()).await,
        )?;
        let name = updated
            .name
            .unwrap_or_else(|| input.name.trim().to_string());

        // 3. Addresses.
        if input.billing_is_shipping() {
            saga.require(
                Step::AssignAddress,
                remote
                    .assign_address(location_id, &[SHIPPING, BILLING], input.shipping_variables())
                    .await,
            )?;
        } else {
            saga.require(
                Step::AssignAddress,
                remote
                    .assign_address(location_id, &[SHIPPING], input.shipping_variables())
                    .await,
            )?;
            saga.require(
                Step::AssignAddress,
                remote
                    .assign_address(location_id, &[BILLING], input.billing_variables())
                    .await,
            )?;
        }

        // 4. Mirror.
        let mirrored = self
            .store
            .locations()
            .update(
                shop,
                location_id,
                UpdateLocation {
                    name: Some(name.clone()),
                    shipping: Some(input.shipping_address.clone()),
                    billing: Some(input.billing().clone()),
                },
            )
            .await;
        let mirrored = saga
            .tolerate(Step::MirrorWrite, mirrored.map_err(StepError::from))
            .is_some();

        info!(shop, location_id, "Location updated");
        Ok(LocationUpdateOutcome {
            remote_location_id: location_id.to_string(),
            name,
            mirrored,
            warnings: saga.finish(),
        })
    }
}

/// Resolve the location admin role and assign it, as one step.
async fn location_admin<G: PlatformGateway>(
    remote: &Remote<'_, G>,
    company_id: &str,
    contact_id: &str,
    location_id: &str,
) -> Result<(ContactRole, RoleAssignment), StepError> {
    let role = find_role(remote, company_id, DEFAULT_CONTACT_ROLE)
        .await?
        .ok_or_else(|| {
            StepError::Failed(WholesaleError::NotFound {
                entity: "company_contact_role".into(),
                id: DEFAULT_CONTACT_ROLE.into(),
            })
        })?;
    let assignment = remote.assign_role(contact_id, &role.id, location_id).await?;
    Ok((role, assignment))
}
