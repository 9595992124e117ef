//! Shared fixtures: a scripted platform gateway and an in-memory mirror.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use wholesale_core::models::address::Address;
use wholesale_core::models::company::{ApplicantContact, Company, CompanyStatus, CreateCompany};
use wholesale_core::models::location::{CreateLocation, Location};
use wholesale_core::models::settings::TenantSettings;
use wholesale_core::models::tenant_session::CreateTenantSession;
use wholesale_core::repository::{
    CompanyRepository, LocationRepository, MirrorStore, SettingsRepository,
    TenantSessionRepository,
};
use wholesale_db::SurrealMirror;
use wholesale_platform::{Operation, OperationResult, PlatformGateway, TenantContext};
use wholesale_provisioning::ProvisioningService;
use wholesale_provisioning::input::{ApplicationInput, CompanyInput, ContactInput, LocationInput};

pub const SHOP: &str = "acme.myshopify.com";
pub const API_KEY: &str = "key-123";
pub const CALLER: &str = "gid://shopify/Customer/100";
pub const REMOTE_COMPANY: &str = "gid://shopify/Company/1";
pub const REMOTE_LOCATION: &str = "gid://shopify/CompanyLocation/10";
pub const REMOTE_CONTACT: &str = "gid://shopify/CompanyContact/20";

pub type Service = ProvisioningService<FakeGateway, SurrealMirror<Db>>;

#[derive(Debug, Clone)]
pub struct Call {
    pub operation: &'static str,
    pub variables: Value,
}

#[derive(Default)]
struct Script {
    replies: HashMap<&'static str, VecDeque<OperationResult>>,
    calls: Vec<Call>,
}

/// Answers each operation with the replies queued for its root field,
/// in order, and records every call. Unscripted calls fail at the
/// transport layer.
#[derive(Clone, Default)]
pub struct FakeGateway {
    script: Arc<Mutex<Script>>,
}

impl FakeGateway {
    pub fn reply(&self, operation: &'static str, data: Value) -> &Self {
        self.push(
            operation,
            OperationResult::Data {
                payload: json!({ operation: data }),
            },
        )
    }

    pub fn push(&self, operation: &'static str, result: OperationResult) -> &Self {
        self.script
            .lock()
            .unwrap()
            .replies
            .entry(operation)
            .or_default()
            .push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.operation).collect()
    }

    pub fn call(&self, operation: &str) -> Option<Call> {
        self.calls().into_iter().find(|c| c.operation == operation)
    }
}

impl PlatformGateway for FakeGateway {
    async fn execute(
        &self,
        _ctx: &TenantContext,
        operation: &Operation,
        variables: Value,
    ) -> OperationResult {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call {
            operation: operation.name,
            variables,
        });
        script
            .replies
            .get_mut(operation.name)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| OperationResult::TransportFailure {
                status: None,
                body: format!("no reply scripted for {}", operation.name),
            })
    }
}

pub async fn service(gateway: FakeGateway) -> Service {
    ProvisioningService::new(gateway, mirror().await)
}

/// In-memory mirror holding an installed session for [`SHOP`].
pub async fn mirror() -> SurrealMirror<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    wholesale_db::run_migrations(&db).await.unwrap();
    let store = SurrealMirror::new(db);
    store
        .sessions()
        .create(CreateTenantSession {
            shop: SHOP.into(),
            access_token: Some("shpat_test".into()),
            api_key: Some(API_KEY.into()),
        })
        .await
        .unwrap();
    store
}

pub async fn set_auto_approval(service: &Service, enabled: bool) {
    service
        .store()
        .settings()
        .upsert(TenantSettings {
            shop: SHOP.into(),
            auto_approval: enabled,
        })
        .await
        .unwrap();
}

pub fn shipping() -> Address {
    Address {
        first_name: Some("Ada".into()),
        address1: Some("1 Main St".into()),
        city: Some("Springfield".into()),
        province: Some("IL".into()),
        zip: Some("62701".into()),
        country_code: Some("US".into()),
        ..Default::default()
    }
}

pub fn application(email: &str) -> ApplicationInput {
    ApplicationInput {
        company: CompanyInput {
            name: "Acme Wholesale".into(),
            external_id: Some("ERP-1".into()),
        },
        contact: ContactInput {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: email.into(),
            job_title: Some("Buyer".into()),
        },
        location: LocationInput {
            name: None,
            shipping_address: shipping(),
            billing_address: None,
            billing_same_as_shipping: true,
        },
    }
}

/// A provisioned company and its first location, written straight to the
/// mirror.
pub async fn provisioned_company(service: &Service) -> (Company, Location) {
    let company = service
        .store()
        .companies()
        .create(CreateCompany {
            shop: SHOP.into(),
            contact_id: None,
            email: "buyer@acme.test".into(),
            name: "Acme Wholesale".into(),
            external_id: None,
            status: CompanyStatus::AutoApprove,
            authorized: true,
            remote_company_id: Some(REMOTE_COMPANY.into()),
            shipping: Some(shipping()),
            billing: Some(shipping()),
            applicant: ApplicantContact::default(),
        })
        .await
        .unwrap();
    let location = service
        .store()
        .locations()
        .create(CreateLocation {
            shop: SHOP.into(),
            company_id: company.id,
            remote_location_id: REMOTE_LOCATION.into(),
            name: "Main Location".into(),
            shipping: Some(shipping()),
            billing: Some(shipping()),
            is_default_shipping: true,
            is_default_billing: true,
        })
        .await
        .unwrap();
    (company, location)
}

// ---------------------------------------------------------------------------
// Platform payloads
// ---------------------------------------------------------------------------

pub fn user_errors(message: &str) -> Value {
    json!({ "userErrors": [{ "field": ["input"], "message": message, "code": "INVALID" }] })
}

pub fn company_created() -> Value {
    json!({
        "company": {
            "id": REMOTE_COMPANY,
            "name": "Acme Wholesale",
            "mainContact": null,
            "locations": { "edges": [{ "node": { "id": REMOTE_LOCATION, "name": "Main Location" } }] }
        },
        "userErrors": []
    })
}

pub fn contact_payload(id: &str) -> Value {
    json!({
        "companyContact": {
            "id": id,
            "company": { "id": REMOTE_COMPANY },
            "customer": { "id": CALLER }
        },
        "userErrors": []
    })
}

/// A bare `companyContact` lookup result.
pub fn contact_node(id: &str, company_id: &str) -> Value {
    json!({ "id": id, "company": { "id": company_id }, "customer": null })
}

pub fn main_contact_assigned() -> Value {
    json!({ "company": { "id": REMOTE_COMPANY }, "userErrors": [] })
}

pub fn roles() -> Value {
    json!({ "contactRoles": { "edges": [
        { "node": { "id": "gid://shopify/CompanyContactRole/1", "name": "Location admin" } },
        { "node": { "id": "gid://shopify/CompanyContactRole/2", "name": "Ordering only" } }
    ] } })
}

pub fn role_assigned(id: &str) -> Value {
    json!({
        "companyContactRoleAssignment": {
            "id": id,
            "role": { "id": "gid://shopify/CompanyContactRole/1", "name": "Location admin" }
        },
        "userErrors": []
    })
}

pub fn location_created(id: &str) -> Value {
    json!({ "companyLocation": { "id": id, "name": "Depot" }, "userErrors": [] })
}

pub fn profiles(company: Option<&str>) -> Value {
    let profiles = match company {
        Some(company_id) => json!([{
            "id": REMOTE_CONTACT,
            "company": { "id": company_id, "name": "Acme Wholesale", "externalId": null, "createdAt": "2025-01-01T00:00:00Z" }
        }]),
        None => json!([]),
    };
    json!({ "id": CALLER, "companyContactProfiles": profiles })
}

pub fn location_owner(location_id: &str, company_id: &str) -> Value {
    json!({ "id": location_id, "company": { "id": company_id } })
}

pub fn addresses_assigned() -> Value {
    json!({ "addresses": [{ "id": "gid://shopify/CompanyAddress/1" }], "userErrors": [] })
}

/// `customerLocations` reply: one profile holding a role on each named
/// location, `(id, name)`.
pub fn customer_locations(locations: &[(&str, &str)]) -> Value {
    let nodes: Vec<Value> = locations
        .iter()
        .enumerate()
        .map(|(i, (id, name))| {
            json!({
                "id": format!("gid://shopify/CompanyContactRoleAssignment/{i}"),
                "companyLocation": {
                    "id": id,
                    "name": name,
                    "billingAddress": null,
                    "shippingAddress": { "address1": "1 Main St", "countryCode": "US" }
                }
            })
        })
        .collect();
    json!({
        "id": CALLER,
        "companyContactProfiles": [{
            "id": REMOTE_CONTACT,
            "company": { "id": REMOTE_COMPANY, "name": "Acme Wholesale" },
            "roleAssignments": { "nodes": nodes }
        }]
    })
}

/// `companyLocation` team reply, one assignment per `(assignment, contact,
/// customer)`.
pub fn location_team(company_id: &str, members: &[(&str, &str, &str)]) -> Value {
    let edges: Vec<Value> = members
        .iter()
        .map(|(assignment, contact, customer)| {
            json!({ "node": {
                "id": assignment,
                "role": { "id": "gid://shopify/CompanyContactRole/1", "name": "Location admin" },
                "companyContact": {
                    "id": contact,
                    "isMainContact": false,
                    "title": null,
                    "customer": { "id": customer, "displayName": "Someone" }
                }
            } })
        })
        .collect();
    json!({
        "id": REMOTE_LOCATION,
        "name": "Main Location",
        "company": { "id": company_id },
        "roleAssignments": {
            "edges": edges,
            "pageInfo": { "endCursor": "c1", "hasNextPage": false, "hasPreviousPage": false, "startCursor": "c0" }
        },
        "billingAddress": { "address1": "1 Main St", "countryCode": "US" },
        "shippingAddress": { "address1": "1 Main St", "countryCode": "US" }
    })
}
