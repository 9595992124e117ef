//! Pipeline B: an admin approves a pending application.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use wholesale_core::error::{WholesaleError, WholesaleResult};
use wholesale_core::models::company::CompanyStatus;
use wholesale_core::models::location::CreateLocation;
use wholesale_core::models::member::CreateCompanyMember;
use wholesale_core::repository::{
    CompanyRepository, ContactRepository, LocationRepository, MemberRepository, MirrorStore,
};
use wholesale_platform::PlatformGateway;

use super::assign_role_best_effort;
use crate::input::{CompanyInput, DEFAULT_LOCATION_NAME, LocationInput, company_create_input, permission_label};
use crate::remote::Remote;
use crate::saga::{Saga, SagaWarning, Step, StepError};
use crate::service::ProvisioningService;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalOutcome {
    pub company_id: Uuid,
    pub remote_company_id: String,
    pub remote_location_id: Option<String>,
    pub role_assignment_id: Option<String>,
    pub warnings: Vec<SagaWarning>,
}

impl<G: PlatformGateway, M: MirrorStore> ProvisioningService<G, M> {
    /// Approve a pending company: provision it on the platform from its
    /// stored snapshot and move it to `approved`.
    ///
    /// Only the remote company creation and the status change are
    /// required. Contact, main contact, role and mirror rows for the
    /// location and member are best-effort and come back as warnings.
    pub async fn approve_company(
        &self,
        shop: &str,
        company_id: Uuid,
        permission: Option<&str>,
    ) -> WholesaleResult<ApprovalOutcome> {
        let mut saga = Saga::new("approve", shop);

        // 1. Only a pending company without a platform id can be approved.
        let company = self.store.companies().get_by_id(shop, company_id).await?;
        if !company.status.can_transition_to(CompanyStatus::Approved)
            || company.remote_company_id.is_some()
        {
            return Err(WholesaleError::InvalidTransition {
                from: company.status.to_string(),
                to: CompanyStatus::Approved.to_string(),
            });
        }
        let contact = match company.contact_id {
            Some(id) => Some(self.store.contacts().get_by_id(shop, id).await?),
            None => None,
        };

        // 2. Create the remote company from the stored snapshot.
        let ctx = self.tenant(shop).await?;
        let remote = Remote::new(&self.gateway, &ctx);
        let preset = self.preset(shop).await?;
        let location_input = LocationInput {
            name: None,
            shipping_address: company.shipping.clone().unwrap_or_default(),
            billing_address: company.billing.clone(),
            billing_same_as_shipping: company.billing.is_none() || company.billing == company.shipping,
        };
        let company_input = CompanyInput {
            name: company.name.clone(),
            external_id: company.external_id.clone(),
        };
        let variables = company_create_input(&company_input, &location_input, &preset);
        let remote_company = saga.require(Step::CreateCompany, remote.create_company(variables).await)?;

        // 3. Applicant becomes contact, then main contact.
        let remote_contact_id = match &contact {
            Some(contact) => saga.tolerate(
                Step::AssignContact,
                remote
                    .assign_customer_as_contact(&remote_company.id, &contact.remote_customer_id)
                    .await,
            ),
            None => {
                saga.warn(Step::AssignContact, "Company has no applicant contact");
                None
            }
        };
        if let Some(contact_id) = &remote_contact_id {
            saga.tolerate(
                Step::AssignMainContact,
                remote
                    .assign_main_contact(&remote_company.id, contact_id)
                    .await,
            );
        }

        // 4. The status change is the point of no return.
        let approved = self
            .store
            .companies()
            .mark_approved(shop, company.id, &remote_company.id)
            .await;
        saga.require(Step::MirrorWrite, approved.map_err(StepError::from))?;
        if let Some(contact) = &contact {
            let linked = self
                .store
                .contacts()
                .link_remote(shop, contact.id, remote_contact_id.clone())
                .await;
            saga.tolerate(Step::MirrorWrite, linked.map_err(StepError::from));
        }

        // 5. Role on the first location the platform created.
        let first_location = remote_company.locations.clone().into_nodes().into_iter().next();
        let label = permission_label(permission).unwrap_or(preset.contact_role.as_str());
        let assigned = match (&remote_contact_id, &first_location) {
            (Some(contact_id), Some(location)) => {
                assign_role_best_effort(
                    &mut saga,
                    &remote,
                    &remote_company.id,
                    contact_id,
                    label,
                    &location.id,
                )
                .await
            }
            _ => {
                saga.warn(Step::AssignRole, "No contact or location to assign a role on");
                None
            }
        };

        // 6. Mirror the location and the member.
        let location_row = match &first_location {
            Some(location) => {
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
                            .unwrap_or_else(|| DEFAULT_LOCATION_NAME.to_string()),
                        shipping: company.shipping.clone(),
                        billing: company.billing.clone(),
                        is_default_shipping: true,
                        is_default_billing: true,
                    })
                    .await;
                saga.tolerate(Step::MirrorWrite, created.map_err(StepError::from))
            }
            None => None,
        };
        if let (Some(location_row), Some(contact_id), Some((role, assignment))) =
            (&location_row, &remote_contact_id, &assigned)
        {
            let created = self
                .store
                .members()
                .create(CreateCompanyMember {
                    shop: shop.to_string(),
                    location_id: location_row.id,
                    contact_id: contact_id.clone(),
                    role_id: Some(role.id.clone()),
                    role_assignment_id: Some(assignment.id.clone()),
                    first_name: company.applicant.first_name.clone(),
                    last_name: company.applicant.last_name.clone(),
                    title: company.applicant.job_title.clone(),
                    email: Some(company.email.clone()),
                })
                .await;
            saga.tolerate(Step::MirrorWrite, created.map_err(StepError::from));
        }

        info!(shop, company_id = %company.id, remote_company_id = %remote_company.id, "Company approved");
        Ok(ApprovalOutcome {
            company_id: company.id,
            remote_company_id: remote_company.id,
            remote_location_id: first_location.map(|l| l.id),
            role_assignment_id: assigned.map(|(_, a)| a.id),
            warnings: saga.finish(),
        })
    }
}
