//! Adding a location from the storefront.

mod common;

use common::*;
use wholesale_core::error::WholesaleError;
use wholesale_core::models::address::Address;
use wholesale_core::repository::{LocationRepository, MemberRepository, MirrorStore};
use wholesale_provisioning::Step;
use wholesale_provisioning::input::{LocationUpdateInput, NewLocationInput};

const NEW_LOCATION: &str = "gid://shopify/CompanyLocation/11";

fn depot() -> NewLocationInput {
    NewLocationInput {
        name: "Depot".into(),
        shipping_address: shipping(),
        billing_address: Some(Address {
            address1: Some("9 Billing Rd".into()),
            country_code: Some("US".into()),
            ..Default::default()
        }),
        billing_same_as_shipping: false,
        is_shipping: Some(true),
        is_billing: None,
    }
}

#[tokio::test]
async fn location_is_created_and_caller_made_admin() {
    let gateway = FakeGateway::default();
    gateway
        .reply("customer", profiles(Some(REMOTE_COMPANY)))
        .reply("companyLocationCreate", location_created(NEW_LOCATION))
        .reply("node", roles())
        .reply("companyContactAssignRole", role_assigned("gid://shopify/RoleAssignment/5"));
    let service = service(gateway.clone()).await;
    let (company, _) = provisioned_company(&service).await;

    let outcome = service.create_location(SHOP, CALLER, depot()).await.unwrap();

    assert_eq!(outcome.remote_location_id, NEW_LOCATION);
    assert_eq!(
        outcome.role_assignment_id.as_deref(),
        Some("gid://shopify/RoleAssignment/5")
    );
    assert!(outcome.warnings.is_empty());

    let create = gateway.call("companyLocationCreate").unwrap();
    assert_eq!(create.variables["companyId"], REMOTE_COMPANY);
    assert_eq!(create.variables["input"]["billingSameAsShipping"], false);
    assert_eq!(create.variables["input"]["billingAddress"]["address1"], "9 Billing Rd");
    let assign = gateway.call("companyContactAssignRole").unwrap();
    assert_eq!(assign.variables["companyContactId"], REMOTE_CONTACT);
    assert_eq!(assign.variables["companyLocationId"], NEW_LOCATION);

    let store = service.store();
    let location = store
        .locations()
        .find_by_remote_id(SHOP, NEW_LOCATION)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(Some(location.id), outcome.location_id);
    assert_eq!(location.company_id, company.id);
    assert!(location.is_default_shipping);
    assert!(!location.is_default_billing);
    assert_eq!(
        location.billing.and_then(|b| b.address1).as_deref(),
        Some("9 Billing Rd")
    );

    let members = store.members().list_by_location(SHOP, location.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].contact_id, REMOTE_CONTACT);
}

#[tokio::test]
async fn role_failure_fails_the_request_but_keeps_the_location() {
    let gateway = FakeGateway::default();
    gateway
        .reply("customer", profiles(Some(REMOTE_COMPANY)))
        .reply("companyLocationCreate", location_created(NEW_LOCATION))
        .reply("node", roles())
        .reply("companyContactAssignRole", user_errors("Contact already has a role"));
    let service = service(gateway.clone()).await;
    provisioned_company(&service).await;

    let err = service.create_location(SHOP, CALLER, depot()).await.unwrap_err();

    match err {
        WholesaleError::RoleAssignmentFailed { location_id, errors } => {
            assert_eq!(location_id, NEW_LOCATION);
            assert_eq!(errors[0].message, "Contact already has a role");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let location = service
        .store()
        .locations()
        .find_by_remote_id(SHOP, NEW_LOCATION)
        .await
        .unwrap()
        .unwrap();
    let members = service
        .store()
        .members()
        .list_by_location(SHOP, location.id)
        .await
        .unwrap();
    assert!(members.is_empty());
}

#[tokio::test]
async fn missing_location_admin_role_fails_the_request() {
    let gateway = FakeGateway::default();
    gateway
        .reply("customer", profiles(Some(REMOTE_COMPANY)))
        .reply("companyLocationCreate", location_created(NEW_LOCATION))
        .reply(
            "node",
            serde_json::json!({ "contactRoles": { "edges": [
                { "node": { "id": "gid://shopify/CompanyContactRole/2", "name": "Ordering only" } }
            ] } }),
        );
    let service = service(gateway.clone()).await;
    provisioned_company(&service).await;

    let err = service.create_location(SHOP, CALLER, depot()).await.unwrap_err();
    match err {
        WholesaleError::RoleAssignmentFailed { location_id, errors } => {
            assert_eq!(location_id, NEW_LOCATION);
            assert_eq!(errors.len(), 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(gateway.call("companyContactAssignRole").is_none());
}

#[tokio::test]
async fn caller_without_a_company_is_rejected_before_creating_anything() {
    let gateway = FakeGateway::default();
    gateway.reply("customer", profiles(None));
    let service = service(gateway.clone()).await;

    let err = service.create_location(SHOP, CALLER, depot()).await.unwrap_err();
    assert!(matches!(err, WholesaleError::Validation { ref message } if message == "Missing companyId"));
    assert_eq!(gateway.operations(), ["customer"]);
}

#[tokio::test]
async fn rejected_location_mirrors_nothing() {
    let gateway = FakeGateway::default();
    gateway
        .reply("customer", profiles(Some(REMOTE_COMPANY)))
        .reply("companyLocationCreate", user_errors("Address is invalid"));
    let service = service(gateway.clone()).await;
    let (company, _) = provisioned_company(&service).await;

    let err = service.create_location(SHOP, CALLER, depot()).await.unwrap_err();
    assert!(matches!(err, WholesaleError::RemoteRejected { .. }));
    let locations = service
        .store()
        .locations()
        .list_by_company(SHOP, company.id)
        .await
        .unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(gateway.operations(), ["customer", "companyLocationCreate"]);
}

fn rename(billing_same_as_shipping: bool) -> LocationUpdateInput {
    LocationUpdateInput {
        location_id: REMOTE_LOCATION.into(),
        name: "North Depot".into(),
        shipping_address: shipping(),
        billing_address: Some(Address {
            address1: Some("9 Billing Rd".into()),
            country_code: Some("US".into()),
            ..Default::default()
        }),
        billing_same_as_shipping,
    }
}

#[tokio::test]
async fn location_update_assigns_both_address_types_at_once() {
    let gateway = FakeGateway::default();
    gateway
        .reply("customer", profiles(Some(REMOTE_COMPANY)))
        .reply("locationOwner", location_owner(REMOTE_LOCATION, REMOTE_COMPANY))
        .reply("companyLocationUpdate", location_created(REMOTE_LOCATION))
        .reply("companyLocationAssignAddress", addresses_assigned());
    let service = service(gateway.clone()).await;
    provisioned_company(&service).await;

    let outcome = service
        .update_location(SHOP, CALLER, rename(true))
        .await
        .unwrap();

    assert!(outcome.mirrored);
    assert!(outcome.warnings.is_empty());
    assert_eq!(
        gateway.operations(),
        [
            "customer",
            "locationOwner",
            "companyLocationUpdate",
            "companyLocationAssignAddress"
        ]
    );
    let update = gateway.call("companyLocationUpdate").unwrap();
    assert_eq!(update.variables["input"]["name"], "North Depot");
    let assign = gateway.call("companyLocationAssignAddress").unwrap();
    assert_eq!(assign.variables["addressTypes"], serde_json::json!(["SHIPPING", "BILLING"]));
    assert_eq!(assign.variables["address"]["address1"], "1 Main St");

    let location = service
        .store()
        .locations()
        .find_by_remote_id(SHOP, REMOTE_LOCATION)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(location.name, "Depot");
    assert_eq!(location.billing, Some(shipping()));
}

#[tokio::test]
async fn location_update_assigns_shipping_before_billing() {
    let gateway = FakeGateway::default();
    gateway
        .reply("customer", profiles(Some(REMOTE_COMPANY)))
        .reply("locationOwner", location_owner(REMOTE_LOCATION, REMOTE_COMPANY))
        .reply("companyLocationUpdate", location_created(REMOTE_LOCATION))
        .reply("companyLocationAssignAddress", addresses_assigned())
        .reply("companyLocationAssignAddress", addresses_assigned());
    let service = service(gateway.clone()).await;
    provisioned_company(&service).await;

    service
        .update_location(SHOP, CALLER, rename(false))
        .await
        .unwrap();

    let assigns: Vec<_> = gateway
        .calls()
        .into_iter()
        .filter(|c| c.operation == "companyLocationAssignAddress")
        .collect();
    assert_eq!(assigns.len(), 2);
    assert_eq!(assigns[0].variables["addressTypes"], serde_json::json!(["SHIPPING"]));
    assert_eq!(assigns[1].variables["addressTypes"], serde_json::json!(["BILLING"]));
    assert_eq!(assigns[1].variables["address"]["address1"], "9 Billing Rd");

    let location = service
        .store()
        .locations()
        .find_by_remote_id(SHOP, REMOTE_LOCATION)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        location.billing.and_then(|a| a.address1).as_deref(),
        Some("9 Billing Rd")
    );
}

#[tokio::test]
async fn location_of_another_company_cannot_be_updated() {
    let gateway = FakeGateway::default();
    gateway
        .reply("customer", profiles(Some(REMOTE_COMPANY)))
        .reply("locationOwner", location_owner(REMOTE_LOCATION, "gid://shopify/Company/999"));
    let service = service(gateway.clone()).await;

    let err = service
        .update_location(SHOP, CALLER, rename(true))
        .await
        .unwrap_err();

    assert!(matches!(err, WholesaleError::NotFound { ref entity, .. } if entity == "company_location"));
    assert_eq!(gateway.operations(), ["customer", "locationOwner"]);
}

#[tokio::test]
async fn rejected_address_stops_before_the_mirror() {
    let gateway = FakeGateway::default();
    gateway
        .reply("customer", profiles(Some(REMOTE_COMPANY)))
        .reply("locationOwner", location_owner(REMOTE_LOCATION, REMOTE_COMPANY))
        .reply("companyLocationUpdate", location_created(REMOTE_LOCATION))
        .reply("companyLocationAssignAddress", user_errors("Zip is invalid"));
    let service = service(gateway.clone()).await;
    provisioned_company(&service).await;

    let err = service
        .update_location(SHOP, CALLER, rename(false))
        .await
        .unwrap_err();

    assert!(matches!(err, WholesaleError::RemoteRejected { ref step, .. } if step == "assign_address"));
    let location = service
        .store()
        .locations()
        .find_by_remote_id(SHOP, REMOTE_LOCATION)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(location.name, "Main Location");
}

#[tokio::test]
async fn unmirrored_location_update_is_a_warning() {
    let gateway = FakeGateway::default();
    gateway
        .reply("customer", profiles(Some(REMOTE_COMPANY)))
        .reply("locationOwner", location_owner(REMOTE_LOCATION, REMOTE_COMPANY))
        .reply("companyLocationUpdate", location_created(REMOTE_LOCATION))
        .reply("companyLocationAssignAddress", addresses_assigned());
    let service = service(gateway.clone()).await;

    let outcome = service
        .update_location(SHOP, CALLER, rename(true))
        .await
        .unwrap();

    assert!(!outcome.mirrored);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].step, Step::MirrorWrite);
}
