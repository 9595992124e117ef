//! Pipeline D: inviting and editing team members.

use serde::Serialize;
use tracing::{error, info};
use wholesale_core::error::{WholesaleError, WholesaleResult};
use wholesale_core::models::member::{CompanyMember, CreateCompanyMember};
use wholesale_core::repository::{LocationRepository, MemberRepository, MirrorStore};
use wholesale_platform::PlatformGateway;
use wholesale_platform::payload::{ContactRole, RoleAssignment};

use super::{assign_role_best_effort, caller_company, find_role};
use crate::input::{EditMemberInput, InviteMemberInput, permission_label};
use crate::remote::Remote;
use crate::saga::{Saga, SagaWarning, Step, StepError};
use crate::service::ProvisioningService;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteOutcome {
    pub contact_id: String,
    pub role_assignment_id: Option<String>,
    pub warnings: Vec<SagaWarning>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    pub new_role_assignment_id: Option<String>,
    pub warnings: Vec<SagaWarning>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl<G: PlatformGateway, M: MirrorStore> ProvisioningService<G, M> {
    /// Create a company contact and give it the requested role on a
    /// location. Only the contact creation is required.
    ///
    /// The company must be the one the caller acts for.
    pub async fn invite_member(
        &self,
        shop: &str,
        caller_id: &str,
        input: InviteMemberInput,
    ) -> WholesaleResult<InviteOutcome> {
        let mut saga = Saga::new("invite_member", shop);
        saga.require(Step::ValidateInput, input.validate().map_err(StepError::from))?;

        let ctx = self.tenant(shop).await?;
        let remote = Remote::new(&self.gateway, &ctx);

        let (_, company_id) = caller_company(&mut saga, &remote, caller_id).await?;
        if input.company_id.trim() != company_id {
            return Err(WholesaleError::NotFound {
                entity: "company".into(),
                id: input.company_id.clone(),
            });
        }

        // 1. Create the contact.
        let contact = saga.require(
            Step::CreateContact,
            remote
                .create_contact(&input.company_id, input.contact_variables())
                .await,
        )?;

        // 2. Role, when both a label and a location were given.
        let location_id = non_blank(input.location_id.as_deref());
        let assigned = match (permission_label(input.permission.as_deref()), location_id) {
            (Some(label), Some(location_id)) => {
                assign_role_best_effort(
                    &mut saga,
                    &remote,
                    &input.company_id,
                    &contact.id,
                    label,
                    location_id,
                )
                .await
            }
            _ => None,
        };

        // 3. Member row only for an assigned role.
        if let (Some((role, assignment)), Some(location_id)) = (&assigned, location_id) {
            let local = self.store.locations().find_by_remote_id(shop, location_id).await;
            match saga.tolerate(Step::MirrorWrite, local.map_err(StepError::from)) {
                Some(Some(location)) => {
                    let c = &input.contact;
                    let created = self
                        .store
                        .members()
                        .create(CreateCompanyMember {
                            shop: shop.to_string(),
                            location_id: location.id,
                            contact_id: contact.id.clone(),
                            role_id: Some(role.id.clone()),
                            role_assignment_id: Some(assignment.id.clone()),
                            first_name: Some(c.first_name.trim().to_string()),
                            last_name: Some(c.last_name.trim().to_string()),
                            title: non_blank(c.title.as_deref()).map(str::to_string),
                            email: Some(c.email.trim().to_string()),
                        })
                        .await;
                    saga.tolerate(Step::MirrorWrite, created.map_err(StepError::from));
                }
                Some(None) => saga.warn(
                    Step::MirrorWrite,
                    format!("Location {location_id} is not mirrored locally"),
                ),
                None => {}
            }
        }

        info!(shop, contact_id = %contact.id, "Team member invited");
        Ok(InviteOutcome {
            contact_id: contact.id,
            role_assignment_id: assigned.map(|(_, a)| a.id),
            warnings: saga.finish(),
        })
    }

    /// Update a contact's profile and, when a new permission is given,
    /// change its role. The contact must belong to the caller's company.
    ///
    /// A role is never changed in place: the old assignment is revoked
    /// first and the new one assigned only once the revoke is confirmed.
    /// The old assignment comes from the input or, failing that, from the
    /// mirrored member row. A failed revoke aborts with the member row
    /// untouched.
    pub async fn edit_member(
        &self,
        shop: &str,
        caller_id: &str,
        input: EditMemberInput,
    ) -> WholesaleResult<EditOutcome> {
        let mut saga = Saga::new("edit_member", shop);
        saga.require(Step::ValidateInput, input.validate().map_err(StepError::from))?;

        let ctx = self.tenant(shop).await?;
        let remote = Remote::new(&self.gateway, &ctx);

        // 1. The contact must be one of the caller's company's.
        let (_, company_id) = caller_company(&mut saga, &remote, caller_id).await?;
        let owner = saga.require(
            Step::CheckOwnership,
            remote.company_contact(&input.contact_id).await,
        )?;
        let owned = owner
            .as_ref()
            .and_then(|c| c.company.as_ref())
            .is_some_and(|company| company.id == company_id);
        if !owned {
            return Err(WholesaleError::NotFound {
                entity: "company_contact".into(),
                id: input.contact_id.clone(),
            });
        }

        // 2. Current assignment, before anything is written.
        let label = permission_label(input.permission.as_deref());
        let member = self
            .store
            .members()
            .find_by_contact(shop, &input.contact_id)
            .await?;
        let previous = non_blank(input.role_assignment_id.as_deref())
            .map(str::to_string)
            .or_else(|| member.as_ref().and_then(|m| m.role_assignment_id.clone()));
        let holds_role = member.as_ref().is_some_and(|m| m.role_id.is_some());
        if label.is_some() && previous.is_none() && holds_role {
            return Err(WholesaleError::Validation {
                message: "Missing roleAssignmentId for the current role".into(),
            });
        }

        // 3. Profile update.
        saga.require(
            Step::UpdateContact,
            remote
                .update_contact(&input.contact_id, input.contact_variables())
                .await,
        )?;

        // 4. Work out the new role before touching the old one.
        let Some(label) = label else {
            self.refresh_member(&mut saga, shop, &input, member, None).await;
            return Ok(EditOutcome {
                new_role_assignment_id: None,
                warnings: saga.finish(),
            });
        };
        let target = match non_blank(input.location_id.as_deref()) {
            Some(location_id) => {
                match saga.tolerate(
                    Step::FetchRoles,
                    find_role(&remote, &company_id, label).await,
                ) {
                    Some(Some(role)) => Some((role, location_id)),
                    Some(None) => {
                        saga.warn(Step::ResolveRole, format!("No role matches '{label}'"));
                        None
                    }
                    None => None,
                }
            }
            None => {
                saga.warn(Step::ResolveRole, "No location given, role left unchanged");
                None
            }
        };
        let Some((role, location_id)) = target else {
            self.refresh_member(&mut saga, shop, &input, member, None).await;
            return Ok(EditOutcome {
                new_role_assignment_id: None,
                warnings: saga.finish(),
            });
        };

        // 5. Revoke, then assign.
        if let Some(old) = previous.as_deref() {
            saga.require(
                Step::RevokeRole,
                remote.revoke_role(&input.contact_id, old).await,
            )?;
        }
        let assigned = remote
            .assign_role(&input.contact_id, &role.id, location_id)
            .await;
        if assigned.is_err() && previous.is_some() {
            error!(
                shop,
                contact_id = %input.contact_id,
                "Previous role was revoked but the new one was not assigned"
            );
        }
        let assignment = saga.require(Step::AssignRole, assigned)?;

        // 6. Mirror the new assignment.
        self.refresh_member(
            &mut saga,
            shop,
            &input,
            member,
            Some((&role, &assignment, location_id)),
        )
        .await;

        info!(shop, contact_id = %input.contact_id, role = %role.name, "Team member role changed");
        Ok(EditOutcome {
            new_role_assignment_id: Some(assignment.id),
            warnings: saga.finish(),
        })
    }

    /// Replace the contact's member row with the edited profile and, if
    /// given, the new role. Failures are warnings; the platform already
    /// holds the truth.
    async fn refresh_member(
        &self,
        saga: &mut Saga,
        shop: &str,
        input: &EditMemberInput,
        member: Option<CompanyMember>,
        role: Option<(&ContactRole, &RoleAssignment, &str)>,
    ) {
        let Some(member) = member else {
            saga.warn(
                Step::MirrorWrite,
                format!("No local member row for {}", input.contact_id),
            );
            return;
        };

        let mut location_id = member.location_id;
        if let Some((_, _, remote_location_id)) = role {
            let local = self
                .store
                .locations()
                .find_by_remote_id(shop, remote_location_id)
                .await;
            if let Some(Some(location)) = saga.tolerate(Step::MirrorWrite, local.map_err(StepError::from)) {
                location_id = location.id;
            }
        }

        let pick = |new: &Option<String>, old: Option<String>| {
            non_blank(new.as_deref()).map(str::to_string).or(old)
        };
        let replacement = CreateCompanyMember {
            shop: shop.to_string(),
            location_id,
            contact_id: member.contact_id.clone(),
            role_id: role.map(|(r, _, _)| r.id.clone()).or(member.role_id),
            role_assignment_id: role
                .map(|(_, a, _)| a.id.clone())
                .or(member.role_assignment_id),
            first_name: pick(&input.first_name, member.first_name),
            last_name: pick(&input.last_name, member.last_name),
            title: pick(&input.title, member.title),
            email: member.email,
        };
        let replaced = self.store.members().replace(shop, member.id, replacement).await;
        saga.tolerate(Step::MirrorWrite, replaced.map_err(StepError::from));
    }
}
