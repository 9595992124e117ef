//! Typed views of operation payloads.
//!
//! Every mutation payload carries `userErrors`; decoding keeps them so the
//! caller decides whether they abort the flow or only warn.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wholesale_core::error::{RemoteUserError, WholesaleError, WholesaleResult};

use crate::operations::Operation;

/// Decode the operation's root field out of a `data` payload.
pub fn decode<T: DeserializeOwned>(operation: &Operation, data: &Value) -> WholesaleResult<T> {
    let root = data
        .get(operation.name)
        .filter(|v| !v.is_null())
        .ok_or_else(|| {
            WholesaleError::RemoteTransport(format!("No payload from {}", operation.name))
        })?;
    T::deserialize(root).map_err(|e| {
        WholesaleError::RemoteTransport(format!("Malformed {} payload: {e}", operation.name))
    })
}

/// Like [`decode`], for lookups by id: a `null` root means the entity
/// does not exist and yields `None`.
pub fn decode_optional<T: DeserializeOwned>(
    operation: &Operation,
    data: &Value,
) -> WholesaleResult<Option<T>> {
    match data.get(operation.name) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => decode(operation, data).map(Some),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdNode {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
}

/// Relay-style connection over edges.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: None,
        }
    }
}

/// Connection queried through its `nodes` shortcut.
#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

/// A company address as the platform returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub zone_code: Option<String>,
    pub zip: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
}

// -----------------------------------------------------------------------
// Mutations
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteLocation {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCompany {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main_contact: Option<IdNode>,
    #[serde(default)]
    pub locations: Connection<RemoteLocation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCreatePayload {
    pub company: Option<RemoteCompany>,
    #[serde(default)]
    pub user_errors: Vec<RemoteUserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCompanyContact {
    pub id: String,
    #[serde(default)]
    pub company: Option<IdNode>,
    #[serde(default)]
    pub customer: Option<IdNode>,
}

/// Shared by `companyAssignCustomerAsContact`, `companyContactCreate`
/// and `companyContactUpdate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContactPayload {
    pub company_contact: Option<RemoteCompanyContact>,
    #[serde(default)]
    pub user_errors: Vec<RemoteUserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignMainContactPayload {
    pub company: Option<IdNode>,
    #[serde(default)]
    pub user_errors: Vec<RemoteUserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCreatePayload {
    pub company_location: Option<RemoteLocation>,
    #[serde(default)]
    pub user_errors: Vec<RemoteUserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdatePayload {
    pub company_location: Option<RemoteLocation>,
    #[serde(default)]
    pub user_errors: Vec<RemoteUserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignAddressPayload {
    #[serde(default)]
    pub addresses: Option<Vec<IdNode>>,
    #[serde(default)]
    pub user_errors: Vec<RemoteUserError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactRole {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub id: String,
    #[serde(default)]
    pub role: Option<ContactRole>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRolePayload {
    pub company_contact_role_assignment: Option<RoleAssignment>,
    #[serde(default)]
    pub user_errors: Vec<RemoteUserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeRolePayload {
    pub revoked_company_contact_role_assignment_id: Option<String>,
    #[serde(default)]
    pub user_errors: Vec<RemoteUserError>,
}

// -----------------------------------------------------------------------
// Queries
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRolesNode {
    #[serde(default)]
    pub contact_roles: Connection<ContactRole>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCompanySummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyContactProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub company: Option<RemoteCompanySummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfiles {
    #[serde(default)]
    pub company_contact_profiles: Vec<CompanyContactProfile>,
}

impl CustomerProfiles {
    /// First profile that carries both a contact id and a company.
    pub fn first_company(&self) -> Option<(&str, &RemoteCompanySummary)> {
        self.company_contact_profiles.iter().find_map(|p| {
            let contact_id = p.id.as_deref()?;
            let company = p.company.as_ref()?;
            Some((contact_id, company))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub billing_address: Option<PlatformAddress>,
    #[serde(default)]
    pub shipping_address: Option<PlatformAddress>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAssignment {
    pub id: String,
    #[serde(default)]
    pub company_location: Option<LocationDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub company: Option<RemoteCompanySummary>,
    #[serde(default)]
    pub role_assignments: Nodes<LocationAssignment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerLocations {
    #[serde(default)]
    pub company_contact_profiles: Vec<LocationProfile>,
}

impl CustomerLocations {
    pub fn first_company(&self) -> Option<&RemoteCompanySummary> {
        self.company_contact_profiles
            .iter()
            .find_map(|p| p.company.as_ref())
    }

    /// Every location the customer holds a role on, in platform order,
    /// each once.
    pub fn locations(&self) -> Vec<&LocationDetail> {
        let mut seen = std::collections::HashSet::new();
        self.company_contact_profiles
            .iter()
            .flat_map(|p| p.role_assignments.nodes.iter())
            .filter_map(|a| a.company_location.as_ref())
            .filter(|l| seen.insert(l.id.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCustomer {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberContactNode {
    pub id: String,
    #[serde(default)]
    pub is_main_contact: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub customer: Option<MemberCustomer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAssignment {
    pub id: String,
    #[serde(default)]
    pub role: Option<ContactRole>,
    #[serde(default)]
    pub company_contact: Option<MemberContactNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMembers {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<IdNode>,
    #[serde(default)]
    pub role_assignments: Connection<MemberAssignment>,
    #[serde(default)]
    pub billing_address: Option<PlatformAddress>,
    #[serde(default)]
    pub shipping_address: Option<PlatformAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationOwner {
    pub id: String,
    #[serde(default)]
    pub company: Option<IdNode>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::operations::{
        COMPANY_CONTACT_ROLES, COMPANY_CREATE, COMPANY_LOCATION_OWNER, CUSTOMER_COMPANY_PROFILES,
        CUSTOMER_LOCATIONS,
    };

    #[test]
    fn company_create_keeps_user_errors() {
        let data = json!({
            "companyCreate": {
                "company": null,
                "userErrors": [{ "field": ["input", "company", "name"], "message": "Name taken", "code": "TAKEN" }]
            }
        });
        let payload: CompanyCreatePayload = decode(&COMPANY_CREATE, &data).unwrap();
        assert!(payload.company.is_none());
        assert_eq!(payload.user_errors[0].message, "Name taken");
        assert_eq!(payload.user_errors[0].code.as_deref(), Some("TAKEN"));
    }

    #[test]
    fn company_create_exposes_first_location() {
        let data = json!({
            "companyCreate": {
                "company": {
                    "id": "gid://shopify/Company/1",
                    "name": "Acme",
                    "mainContact": null,
                    "locations": { "edges": [{ "node": { "id": "gid://shopify/CompanyLocation/9", "name": "Main" } }] }
                },
                "userErrors": []
            }
        });
        let payload: CompanyCreatePayload = decode(&COMPANY_CREATE, &data).unwrap();
        let company = payload.company.unwrap();
        let locations = company.locations.into_nodes();
        assert_eq!(locations[0].id, "gid://shopify/CompanyLocation/9");
    }

    #[test]
    fn roles_keep_platform_order() {
        let data = json!({
            "node": { "contactRoles": { "edges": [
                { "node": { "id": "r1", "name": "Location admin" } },
                { "node": { "id": "r2", "name": "Ordering only" } }
            ] } }
        });
        let node: CompanyRolesNode = decode(&COMPANY_CONTACT_ROLES, &data).unwrap();
        let names: Vec<_> = node.contact_roles.into_nodes().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["Location admin", "Ordering only"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = decode::<CustomerProfiles>(&CUSTOMER_COMPANY_PROFILES, &json!({ "customer": null }))
            .unwrap_err();
        assert_eq!(err.to_string(), "Platform request failed: No payload from customer");
    }

    #[test]
    fn customer_locations_are_deduplicated_in_order() {
        let data = json!({
            "customerLocations": { "companyContactProfiles": [
                { "id": "c1", "company": { "id": "co1", "name": "Acme" }, "roleAssignments": { "nodes": [
                    { "id": "a1", "companyLocation": { "id": "l2", "name": "Depot" } },
                    { "id": "a2", "companyLocation": { "id": "l1", "name": "Main" } }
                ] } },
                { "id": "c2", "company": { "id": "co1" }, "roleAssignments": { "nodes": [
                    { "id": "a3", "companyLocation": { "id": "l2", "name": "Depot" } },
                    { "id": "a4", "companyLocation": null }
                ] } }
            ] }
        });
        let found: CustomerLocations = decode(&CUSTOMER_LOCATIONS, &data).unwrap();
        let ids: Vec<_> = found.locations().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["l2", "l1"]);
        assert_eq!(found.first_company().unwrap().id, "co1");
    }

    #[test]
    fn null_lookup_is_none() {
        let missing: Option<LocationOwner> =
            decode_optional(&COMPANY_LOCATION_OWNER, &json!({ "locationOwner": null })).unwrap();
        assert!(missing.is_none());
        let found: Option<LocationOwner> = decode_optional(
            &COMPANY_LOCATION_OWNER,
            &json!({ "locationOwner": { "id": "l1", "company": { "id": "co1" } } }),
        )
        .unwrap();
        assert_eq!(found.unwrap().company.unwrap().id, "co1");
    }

    #[test]
    fn first_company_skips_incomplete_profiles() {
        let profiles: CustomerProfiles = serde_json::from_value(json!({
            "companyContactProfiles": [
                { "id": "c0", "company": null },
                { "id": "c1", "company": { "id": "co1", "name": "Acme" } }
            ]
        }))
        .unwrap();
        let (contact, company) = profiles.first_company().unwrap();
        assert_eq!(contact, "c1");
        assert_eq!(company.id, "co1");
    }
}
