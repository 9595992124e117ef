//! Typed wrappers over platform operations.
//!
//! Each wrapper turns the operation's embedded `userErrors` into
//! [`StepError::Rejected`] and everything else that went wrong into
//! [`StepError::Failed`]. Whether either aborts is the pipeline's call.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use wholesale_core::error::WholesaleError;
use wholesale_platform::operations::{
    COMPANY_ASSIGN_CUSTOMER_AS_CONTACT, COMPANY_ASSIGN_MAIN_CONTACT, COMPANY_CONTACT,
    COMPANY_CONTACT_ASSIGN_ROLE, COMPANY_CONTACT_CREATE, COMPANY_CONTACT_REVOKE_ROLE,
    COMPANY_CONTACT_ROLES, COMPANY_CONTACT_UPDATE, COMPANY_CREATE, COMPANY_LOCATION_ASSIGN_ADDRESS,
    COMPANY_LOCATION_CREATE, COMPANY_LOCATION_MEMBERS, COMPANY_LOCATION_OWNER,
    COMPANY_LOCATION_UPDATE, CUSTOMER_COMPANY_PROFILES, CUSTOMER_LOCATIONS,
};
use wholesale_platform::payload::{
    self, AssignAddressPayload, AssignMainContactPayload, AssignRolePayload, CompanyContactPayload,
    CompanyCreatePayload, CompanyRolesNode, ContactRole, CustomerLocations, CustomerProfiles,
    LocationCreatePayload, LocationMembers, LocationOwner, LocationUpdatePayload, RemoteCompany,
    RemoteCompanyContact, RemoteLocation, RevokeRolePayload, RoleAssignment,
};
use wholesale_platform::{Operation, PlatformGateway, TenantContext};

use crate::saga::StepError;

fn missing(operation: &Operation, what: &str) -> StepError {
    StepError::Failed(WholesaleError::RemoteTransport(format!(
        "{} returned no {what}",
        operation.name
    )))
}

/// Platform calls for one tenant.
pub struct Remote<'a, G> {
    gateway: &'a G,
    ctx: &'a TenantContext,
}

impl<'a, G: PlatformGateway> Remote<'a, G> {
    pub fn new(gateway: &'a G, ctx: &'a TenantContext) -> Self {
        Self { gateway, ctx }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
    ) -> Result<T, StepError> {
        let data = self
            .gateway
            .execute(self.ctx, operation, variables)
            .await
            .into_data(operation)?;
        Ok(payload::decode(operation, &data)?)
    }

    async fn lookup<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
    ) -> Result<Option<T>, StepError> {
        let data = self
            .gateway
            .execute(self.ctx, operation, variables)
            .await
            .into_data(operation)?;
        Ok(payload::decode_optional(operation, &data)?)
    }

    pub async fn create_company(&self, input: Value) -> Result<RemoteCompany, StepError> {
        let payload: CompanyCreatePayload =
            self.call(&COMPANY_CREATE, json!({ "input": input })).await?;
        if !payload.user_errors.is_empty() {
            return Err(StepError::Rejected(payload.user_errors));
        }
        payload.company.ok_or_else(|| missing(&COMPANY_CREATE, "company"))
    }

    /// Returns the new company contact id.
    pub async fn assign_customer_as_contact(
        &self,
        company_id: &str,
        customer_id: &str,
    ) -> Result<String, StepError> {
        let payload: CompanyContactPayload = self
            .call(
                &COMPANY_ASSIGN_CUSTOMER_AS_CONTACT,
                json!({ "companyId": company_id, "customerId": customer_id }),
            )
            .await?;
        if !payload.user_errors.is_empty() {
            return Err(StepError::Rejected(payload.user_errors));
        }
        payload
            .company_contact
            .map(|c| c.id)
            .ok_or_else(|| missing(&COMPANY_ASSIGN_CUSTOMER_AS_CONTACT, "company contact"))
    }

    pub async fn assign_main_contact(
        &self,
        company_id: &str,
        company_contact_id: &str,
    ) -> Result<(), StepError> {
        let payload: AssignMainContactPayload = self
            .call(
                &COMPANY_ASSIGN_MAIN_CONTACT,
                json!({ "companyId": company_id, "companyContactId": company_contact_id }),
            )
            .await?;
        if !payload.user_errors.is_empty() {
            return Err(StepError::Rejected(payload.user_errors));
        }
        Ok(())
    }

    pub async fn create_location(
        &self,
        company_id: &str,
        input: Value,
    ) -> Result<RemoteLocation, StepError> {
        let payload: LocationCreatePayload = self
            .call(
                &COMPANY_LOCATION_CREATE,
                json!({ "companyId": company_id, "input": input }),
            )
            .await?;
        if !payload.user_errors.is_empty() {
            return Err(StepError::Rejected(payload.user_errors));
        }
        payload
            .company_location
            .ok_or_else(|| missing(&COMPANY_LOCATION_CREATE, "location"))
    }

    pub async fn create_contact(
        &self,
        company_id: &str,
        input: Value,
    ) -> Result<RemoteCompanyContact, StepError> {
        self.contact_mutation(
            &COMPANY_CONTACT_CREATE,
            json!({ "companyId": company_id, "input": input }),
        )
        .await
    }

    pub async fn update_contact(
        &self,
        company_contact_id: &str,
        input: Value,
    ) -> Result<RemoteCompanyContact, StepError> {
        self.contact_mutation(
            &COMPANY_CONTACT_UPDATE,
            json!({ "companyContactId": company_contact_id, "input": input }),
        )
        .await
    }

    async fn contact_mutation(
        &self,
        operation: &Operation,
        variables: Value,
    ) -> Result<RemoteCompanyContact, StepError> {
        let payload: CompanyContactPayload = self.call(operation, variables).await?;
        if !payload.user_errors.is_empty() {
            return Err(StepError::Rejected(payload.user_errors));
        }
        payload
            .company_contact
            .ok_or_else(|| missing(operation, "company contact"))
    }

    /// Roles defined on the company, in platform order.
    pub async fn contact_roles(&self, company_id: &str) -> Result<Vec<ContactRole>, StepError> {
        let node: CompanyRolesNode = self
            .call(&COMPANY_CONTACT_ROLES, json!({ "companyId": company_id }))
            .await?;
        Ok(node.contact_roles.into_nodes())
    }

    pub async fn assign_role(
        &self,
        company_contact_id: &str,
        role_id: &str,
        location_id: &str,
    ) -> Result<RoleAssignment, StepError> {
        let payload: AssignRolePayload = self
            .call(
                &COMPANY_CONTACT_ASSIGN_ROLE,
                json!({
                    "companyContactId": company_contact_id,
                    "companyContactRoleId": role_id,
                    "companyLocationId": location_id,
                }),
            )
            .await?;
        if !payload.user_errors.is_empty() {
            return Err(StepError::Rejected(payload.user_errors));
        }
        payload
            .company_contact_role_assignment
            .ok_or_else(|| missing(&COMPANY_CONTACT_ASSIGN_ROLE, "role assignment"))
    }

    /// Succeeds only when the platform confirms which assignment it
    /// revoked.
    pub async fn revoke_role(
        &self,
        company_contact_id: &str,
        role_assignment_id: &str,
    ) -> Result<String, StepError> {
        let payload: RevokeRolePayload = self
            .call(
                &COMPANY_CONTACT_REVOKE_ROLE,
                json!({
                    "companyContactId": company_contact_id,
                    "companyContactRoleAssignmentId": role_assignment_id,
                }),
            )
            .await?;
        if !payload.user_errors.is_empty() {
            return Err(StepError::Rejected(payload.user_errors));
        }
        payload
            .revoked_company_contact_role_assignment_id
            .ok_or_else(|| missing(&COMPANY_CONTACT_REVOKE_ROLE, "revoked assignment"))
    }

    pub async fn customer_profiles(&self, customer_id: &str) -> Result<CustomerProfiles, StepError> {
        self.call(&CUSTOMER_COMPANY_PROFILES, json!({ "customerId": customer_id }))
            .await
    }

    /// `None` when no such contact exists.
    pub async fn company_contact(
        &self,
        company_contact_id: &str,
    ) -> Result<Option<RemoteCompanyContact>, StepError> {
        self.lookup(&COMPANY_CONTACT, json!({ "companyContactId": company_contact_id }))
            .await
    }

    /// Locations the customer holds a role on. `query` is the platform's
    /// search syntax, e.g. `name:*depot*`.
    pub async fn customer_locations(
        &self,
        customer_id: &str,
        first: u32,
        query: Option<&str>,
    ) -> Result<CustomerLocations, StepError> {
        self.call(
            &CUSTOMER_LOCATIONS,
            json!({ "customerId": customer_id, "first": first, "query": query }),
        )
        .await
    }

    pub async fn location_members(
        &self,
        location_id: &str,
        first: u32,
        after: Option<&str>,
    ) -> Result<Option<LocationMembers>, StepError> {
        self.lookup(
            &COMPANY_LOCATION_MEMBERS,
            json!({ "locationId": location_id, "first": first, "after": after }),
        )
        .await
    }

    pub async fn location_owner(&self, location_id: &str) -> Result<Option<LocationOwner>, StepError> {
        self.lookup(&COMPANY_LOCATION_OWNER, json!({ "locationId": location_id }))
            .await
    }

    pub async fn update_location(
        &self,
        location_id: &str,
        input: Value,
    ) -> Result<RemoteLocation, StepError> {
        let payload: LocationUpdatePayload = self
            .call(
                &COMPANY_LOCATION_UPDATE,
                json!({ "companyLocationId": location_id, "input": input }),
            )
            .await?;
        if !payload.user_errors.is_empty() {
            return Err(StepError::Rejected(payload.user_errors));
        }
        payload
            .company_location
            .ok_or_else(|| missing(&COMPANY_LOCATION_UPDATE, "location"))
    }

    /// Set the location's address for each of `address_types`
    /// (`SHIPPING`, `BILLING`).
    pub async fn assign_address(
        &self,
        location_id: &str,
        address_types: &[&str],
        address: Value,
    ) -> Result<(), StepError> {
        let payload: AssignAddressPayload = self
            .call(
                &COMPANY_LOCATION_ASSIGN_ADDRESS,
                json!({
                    "locationId": location_id,
                    "addressTypes": address_types,
                    "address": address,
                }),
            )
            .await?;
        if !payload.user_errors.is_empty() {
            return Err(StepError::Rejected(payload.user_errors));
        }
        match payload.addresses {
            Some(_) => Ok(()),
            None => Err(missing(&COMPANY_LOCATION_ASSIGN_ADDRESS, "addresses")),
        }
    }
}
