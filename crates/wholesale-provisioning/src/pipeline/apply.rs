//! Pipeline A: a storefront customer applies for a wholesale account.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;
use wholesale_core::error::{WholesaleError, WholesaleResult};
use wholesale_core::models::company::{Company, CompanyStatus, CreateCompany};
use wholesale_core::models::contact::{CompanyContact, CreateCompanyContact};
use wholesale_core::repository::{
    CompanyRepository, ContactRepository, MirrorStore, SettingsRepository,
};
use wholesale_platform::PlatformGateway;

use crate::input::{ApplicationInput, company_create_input};
use crate::remote::Remote;
use crate::saga::{Saga, SagaWarning, Step, StepError};
use crate::service::ProvisioningService;
use crate::tenant::TenantContextResolver;

/// Result of a submitted application.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationOutcome {
    /// `pending` when the shop reviews applications, `autoApprove` when
    /// the company was provisioned right away.
    pub status: CompanyStatus,
    pub company_id: Uuid,
    pub remote_company_id: Option<String>,
    pub warnings: Vec<SagaWarning>,
}

/// Company shown to a returning applicant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySnapshot {
    pub id: String,
    pub name: Option<String>,
    pub external_id: Option<String>,
    pub created_at: Option<String>,
    pub company_status: CompanyStatus,
}

impl From<&Company> for CompanySnapshot {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.to_string(),
            name: Some(company.name.clone()),
            external_id: company.external_id.clone(),
            created_at: Some(company.created_at.to_rfc3339()),
            company_status: company.status,
        }
    }
}

/// A company the caller already belongs to. `local` tells whether it
/// came from the mirror or from the platform.
#[derive(Debug, Clone, Serialize)]
pub struct ExistingCompany {
    pub local: bool,
    pub company: CompanySnapshot,
}

impl<G: PlatformGateway, M: MirrorStore> ProvisioningService<G, M> {
    async fn local_company(&self, shop: &str, caller_id: &str) -> WholesaleResult<Option<Company>> {
        match self.store.contacts().find_by_customer(shop, caller_id).await? {
            Some(contact) => self.store.companies().find_by_contact(shop, contact.id).await,
            None => Ok(None),
        }
    }

    /// The caller's company, looked up in the mirror first and on the
    /// platform second. A company only known to the platform was
    /// provisioned without review and is reported as `autoApprove`.
    pub async fn check_existing_company(
        &self,
        shop: &str,
        caller_id: &str,
    ) -> WholesaleResult<Option<ExistingCompany>> {
        if let Some(company) = self.local_company(shop, caller_id).await? {
            return Ok(Some(ExistingCompany {
                local: true,
                company: CompanySnapshot::from(&company),
            }));
        }

        let ctx = match self.tenant(shop).await {
            Ok(ctx) => ctx,
            Err(WholesaleError::NotFound { .. } | WholesaleError::TenantCredentialMissing { .. }) => {
                warn!(shop, "No platform credential, skipping remote company lookup");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let profiles = Remote::new(&self.gateway, &ctx)
            .customer_profiles(caller_id)
            .await
            .map_err(|e| e.into_error(Step::CheckExisting))?;

        Ok(profiles.first_company().map(|(_, company)| ExistingCompany {
            local: false,
            company: CompanySnapshot {
                id: company.id.clone(),
                name: company.name.clone(),
                external_id: company.external_id.clone(),
                created_at: company.created_at.clone(),
                company_status: CompanyStatus::AutoApprove,
            },
        }))
    }

    /// Status lookup for callers holding the shop's API key instead of
    /// a session token. Reads the mirror only.
    pub async fn application_status(
        &self,
        shop: &str,
        api_key: &str,
        customer_id: &str,
    ) -> WholesaleResult<Option<CompanySnapshot>> {
        TenantContextResolver::new(self.store.sessions())
            .authorize_api_key(shop, api_key)
            .await?;
        Ok(self
            .local_company(shop, customer_id)
            .await?
            .as_ref()
            .map(CompanySnapshot::from))
    }

    /// Submit an application.
    ///
    /// With auto-approval off the application is recorded locally as
    /// `pending` and the platform is not called. With it on, the company
    /// is created on the platform, the caller is made its main contact,
    /// and the result is mirrored as `autoApprove`.
    pub async fn submit_application(
        &self,
        shop: &str,
        caller_id: &str,
        input: ApplicationInput,
    ) -> WholesaleResult<ApplicationOutcome> {
        let mut saga = Saga::new("apply", shop);

        // 1. Validate and look for an earlier application by this caller.
        saga.require(
            Step::ValidateInput,
            input.validate(caller_id).map_err(StepError::from),
        )?;
        let contact = self.store.contacts().find_by_customer(shop, caller_id).await?;
        if let Some(contact) = &contact {
            let existing = self
                .store
                .companies()
                .find_by_contact(shop, contact.id)
                .await?;
            if existing.is_some() {
                info!(shop, caller_id, "Caller already has an application");
                return Err(WholesaleError::AlreadyExists {
                    entity: "company".into(),
                });
            }
        }

        // 2. Without auto-approval nothing leaves this process.
        let auto_approval = self
            .store
            .settings()
            .get(shop)
            .await?
            .is_some_and(|s| s.auto_approval);
        if !auto_approval {
            return self.record_pending(saga, shop, caller_id, &input, contact).await;
        }

        // No remote company for an email the mirror already holds.
        if self
            .store
            .companies()
            .find_by_email(shop, input.contact.email.trim())
            .await?
            .is_some()
        {
            return Err(WholesaleError::AlreadyExists {
                entity: "company".into(),
            });
        }

        // 3. Create the remote company from the preset overlay.
        let ctx = self.tenant(shop).await?;
        let remote = Remote::new(&self.gateway, &ctx);
        let preset = self.preset(shop).await?;
        let variables = company_create_input(&input.company, &input.location, &preset);
        let remote_company = saga.require(Step::CreateCompany, remote.create_company(variables).await)?;

        // 4. Make the caller a contact, then the main contact.
        let remote_contact_id = saga.tolerate(
            Step::AssignContact,
            remote
                .assign_customer_as_contact(&remote_company.id, caller_id)
                .await,
        );
        if let Some(contact_id) = &remote_contact_id {
            saga.tolerate(
                Step::AssignMainContact,
                remote
                    .assign_main_contact(&remote_company.id, contact_id)
                    .await,
            );
        }

        // 5. Mirror what exists remotely.
        let mirrored = self
            .mirror_provisioned(
                shop,
                caller_id,
                &input,
                contact,
                &remote_company.id,
                remote_contact_id,
            )
            .await;
        let company = saga.require(Step::MirrorWrite, mirrored.map_err(StepError::from))?;

        Ok(ApplicationOutcome {
            status: company.status,
            company_id: company.id,
            remote_company_id: company.remote_company_id,
            warnings: saga.finish(),
        })
    }

    async fn record_pending(
        &self,
        mut saga: Saga,
        shop: &str,
        caller_id: &str,
        input: &ApplicationInput,
        contact: Option<CompanyContact>,
    ) -> WholesaleResult<ApplicationOutcome> {
        let contact_id = contact.as_ref().map_or_else(Uuid::new_v4, |c| c.id);
        let written = self
            .store
            .companies()
            .create(company_row(shop, input, contact_id, CompanyStatus::Pending, None))
            .await;
        let company = saga.require(Step::MirrorWrite, written.map_err(StepError::from))?;

        if contact.is_none() {
            let created = self
                .store
                .contacts()
                .create(contact_row(shop, caller_id, input, contact_id, None, false))
                .await;
            if let Err(e) = created {
                // A company row must not point at a missing contact.
                if let Err(cleanup) = self.store.companies().delete(shop, company.id).await {
                    warn!(shop, company_id = %company.id, error = %cleanup, "Failed to remove orphaned company");
                }
                return saga.require(Step::MirrorWrite, Err(StepError::from(e)));
            }
        }

        info!(shop, company_id = %company.id, "Application recorded for review");
        Ok(ApplicationOutcome {
            status: company.status,
            company_id: company.id,
            remote_company_id: None,
            warnings: saga.finish(),
        })
    }

    async fn mirror_provisioned(
        &self,
        shop: &str,
        caller_id: &str,
        input: &ApplicationInput,
        contact: Option<CompanyContact>,
        remote_company_id: &str,
        remote_contact_id: Option<String>,
    ) -> WholesaleResult<Company> {
        let contact_id = contact.as_ref().map_or_else(Uuid::new_v4, |c| c.id);
        let mut row = company_row(
            shop,
            input,
            contact_id,
            CompanyStatus::AutoApprove,
            Some(remote_company_id.to_string()),
        );
        // The company is only linked to a contact the platform accepted.
        if remote_contact_id.is_none() {
            row.contact_id = None;
        }
        let company = self.store.companies().create(row).await?;

        let contact_written = match contact {
            Some(existing) => self
                .store
                .contacts()
                .link_remote(shop, existing.id, remote_contact_id)
                .await
                .map(|_| ()),
            None => self
                .store
                .contacts()
                .create(contact_row(
                    shop,
                    caller_id,
                    input,
                    contact_id,
                    remote_contact_id,
                    true,
                ))
                .await
                .map(|_| ()),
        };
        if let Err(e) = contact_written {
            // Same rule as for pending rows: no company without its contact.
            if let Err(cleanup) = self.store.companies().delete(shop, company.id).await {
                warn!(shop, company_id = %company.id, error = %cleanup, "Failed to remove orphaned company");
            }
            return Err(e);
        }
        Ok(company)
    }
}

fn company_row(
    shop: &str,
    input: &ApplicationInput,
    contact_id: Uuid,
    status: CompanyStatus,
    remote_company_id: Option<String>,
) -> CreateCompany {
    CreateCompany {
        shop: shop.to_string(),
        contact_id: Some(contact_id),
        email: input.contact.email.trim().to_string(),
        name: input.company.name.trim().to_string(),
        external_id: input
            .company
            .external_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        status,
        authorized: remote_company_id.is_some(),
        remote_company_id,
        shipping: Some(input.location.shipping_address.clone()),
        billing: Some(input.location.billing().clone()),
        applicant: input.applicant(),
    }
}

fn contact_row(
    shop: &str,
    caller_id: &str,
    input: &ApplicationInput,
    id: Uuid,
    remote_contact_id: Option<String>,
    approved: bool,
) -> CreateCompanyContact {
    CreateCompanyContact {
        id: Some(id),
        shop: shop.to_string(),
        remote_customer_id: caller_id.to_string(),
        remote_contact_id,
        name: input.contact_name(),
        email: Some(input.contact.email.trim().to_string()),
        approved,
    }
}
