//! Admin approval of pending applications.

mod common;

use common::*;
use wholesale_core::error::WholesaleError;
use wholesale_core::models::company::CompanyStatus;
use wholesale_core::repository::{
    CompanyRepository, ContactRepository, LocationRepository, MemberRepository, MirrorStore,
};
use wholesale_provisioning::Step;

async fn pending(service: &Service) -> uuid::Uuid {
    service
        .submit_application(SHOP, CALLER, application("ada@acme.test"))
        .await
        .unwrap()
        .company_id
}

#[tokio::test]
async fn approval_provisions_and_mirrors_everything() {
    let gateway = FakeGateway::default();
    gateway
        .reply("companyCreate", company_created())
        .reply("companyAssignCustomerAsContact", contact_payload(REMOTE_CONTACT))
        .reply("companyAssignMainContact", main_contact_assigned())
        .reply("node", roles())
        .reply("companyContactAssignRole", role_assigned("gid://shopify/RoleAssignment/1"));
    let service = service(gateway.clone()).await;
    let company_id = pending(&service).await;

    let outcome = service.approve_company(SHOP, company_id, None).await.unwrap();

    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    assert_eq!(outcome.remote_company_id, REMOTE_COMPANY);
    assert_eq!(outcome.remote_location_id.as_deref(), Some(REMOTE_LOCATION));
    assert_eq!(
        outcome.role_assignment_id.as_deref(),
        Some("gid://shopify/RoleAssignment/1")
    );

    let assign = gateway.call("companyContactAssignRole").unwrap();
    assert_eq!(assign.variables["companyContactId"], REMOTE_CONTACT);
    assert_eq!(assign.variables["companyLocationId"], REMOTE_LOCATION);
    assert_eq!(
        assign.variables["companyContactRoleId"],
        "gid://shopify/CompanyContactRole/1"
    );
    let create = gateway.call("companyAssignCustomerAsContact").unwrap();
    assert_eq!(create.variables["customerId"], CALLER);

    let store = service.store();
    let company = store.companies().get_by_id(SHOP, company_id).await.unwrap();
    assert_eq!(company.status, CompanyStatus::Approved);
    assert_eq!(company.remote_company_id.as_deref(), Some(REMOTE_COMPANY));
    assert!(company.authorized);

    let contact = store.contacts().find_by_customer(SHOP, CALLER).await.unwrap().unwrap();
    assert_eq!(contact.remote_contact_id.as_deref(), Some(REMOTE_CONTACT));
    assert!(contact.approved);

    let locations = store.locations().list_by_company(SHOP, company_id).await.unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].remote_location_id, REMOTE_LOCATION);
    assert!(locations[0].is_default_shipping && locations[0].is_default_billing);

    let members = store.members().list_by_location(SHOP, locations[0].id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].contact_id, REMOTE_CONTACT);
    assert_eq!(
        members[0].role_assignment_id.as_deref(),
        Some("gid://shopify/RoleAssignment/1")
    );
    assert_eq!(members[0].email.as_deref(), Some("ada@acme.test"));
}

#[tokio::test]
async fn approved_company_cannot_be_approved_again() {
    let gateway = FakeGateway::default();
    gateway
        .reply("companyCreate", company_created())
        .reply("companyAssignCustomerAsContact", contact_payload(REMOTE_CONTACT))
        .reply("companyAssignMainContact", main_contact_assigned())
        .reply("node", roles())
        .reply("companyContactAssignRole", role_assigned("gid://shopify/RoleAssignment/1"));
    let service = service(gateway.clone()).await;
    let company_id = pending(&service).await;
    service.approve_company(SHOP, company_id, None).await.unwrap();
    let calls = gateway.calls().len();

    let err = service.approve_company(SHOP, company_id, None).await.unwrap_err();
    assert!(matches!(err, WholesaleError::InvalidTransition { .. }));
    assert_eq!(gateway.calls().len(), calls);
}

#[tokio::test]
async fn unresolved_role_does_not_revert_approval() {
    let gateway = FakeGateway::default();
    gateway
        .reply("companyCreate", company_created())
        .reply("companyAssignCustomerAsContact", contact_payload(REMOTE_CONTACT))
        .reply("companyAssignMainContact", main_contact_assigned())
        .reply("node", roles());
    let service = service(gateway.clone()).await;
    let company_id = pending(&service).await;

    let outcome = service
        .approve_company(SHOP, company_id, Some("warehouse-manager"))
        .await
        .unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].step, Step::ResolveRole);
    assert!(outcome.role_assignment_id.is_none());
    assert!(gateway.call("companyContactAssignRole").is_none());

    let store = service.store();
    let company = store.companies().get_by_id(SHOP, company_id).await.unwrap();
    assert_eq!(company.status, CompanyStatus::Approved);
    let locations = store.locations().list_by_company(SHOP, company_id).await.unwrap();
    assert_eq!(locations.len(), 1);
    let members = store.members().list_by_location(SHOP, locations[0].id).await.unwrap();
    assert!(members.is_empty());
}

#[tokio::test]
async fn failed_role_assignment_is_a_warning() {
    let gateway = FakeGateway::default();
    gateway
        .reply("companyCreate", company_created())
        .reply("companyAssignCustomerAsContact", contact_payload(REMOTE_CONTACT))
        .reply("companyAssignMainContact", main_contact_assigned())
        .reply("node", roles())
        .reply("companyContactAssignRole", user_errors("Role cannot be assigned"));
    let service = service(gateway.clone()).await;
    let company_id = pending(&service).await;

    let outcome = service.approve_company(SHOP, company_id, None).await.unwrap();
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].step, Step::AssignRole);
    let company = service.store().companies().get_by_id(SHOP, company_id).await.unwrap();
    assert_eq!(company.status, CompanyStatus::Approved);
}

#[tokio::test]
async fn rejected_remote_company_keeps_the_application_pending() {
    let gateway = FakeGateway::default();
    gateway.reply("companyCreate", user_errors("External id taken"));
    let service = service(gateway.clone()).await;
    let company_id = pending(&service).await;

    let err = service.approve_company(SHOP, company_id, None).await.unwrap_err();
    assert!(matches!(err, WholesaleError::RemoteRejected { .. }));

    let company = service.store().companies().get_by_id(SHOP, company_id).await.unwrap();
    assert_eq!(company.status, CompanyStatus::Pending);
    assert!(company.remote_company_id.is_none());
    assert_eq!(gateway.operations(), ["companyCreate"]);
}
