//! HTTP surface tests: routing, authentication and error rendering.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use tower::util::ServiceExt;
use wholesale_auth::{SessionTokenConfig, SessionVerifier};
use wholesale_core::models::tenant_session::CreateTenantSession;
use wholesale_core::repository::{MirrorStore, TenantSessionRepository};
use wholesale_db::SurrealMirror;
use wholesale_platform::{Operation, OperationResult, PlatformGateway, TenantContext};
use wholesale_provisioning::ProvisioningService;
use wholesale_server::{AppState, create_router};

const SECRET: &str = "test-app-secret";
const SHOP: &str = "acme.myshopify.com";
const API_KEY: &str = "key-123";
const CALLER: &str = "gid://shopify/Customer/42";

/// Answers each operation with a fixed payload.
#[derive(Clone, Default)]
struct StubGateway {
    replies: Arc<HashMap<&'static str, Value>>,
}

impl PlatformGateway for StubGateway {
    async fn execute(&self, _ctx: &TenantContext, operation: &Operation, _variables: Value) -> OperationResult {
        match self.replies.get(operation.name) {
            Some(data) => OperationResult::Data {
                payload: json!({ operation.name: data }),
            },
            None => OperationResult::TransportFailure {
                status: Some(503),
                body: "unavailable".into(),
            },
        }
    }
}

async fn app_with(replies: HashMap<&'static str, Value>, secret: Option<&str>) -> Router {
    let db: Surreal<Db> = Surreal::new::<Mem>(()).await.unwrap();
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

    let gateway = StubGateway {
        replies: Arc::new(replies),
    };
    let verifier = SessionVerifier::new(SessionTokenConfig {
        api_secret: secret.map(str::to_string),
        ..Default::default()
    });
    create_router(
        AppState::new(ProvisioningService::new(gateway, store), verifier),
        false,
    )
}

async fn app() -> Router {
    app_with(HashMap::new(), Some(SECRET)).await
}

fn token(exp_offset: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = json!({
        "iss": format!("https://{SHOP}/admin"),
        "dest": format!("https://{SHOP}"),
        "sub": CALLER,
        "exp": now + exp_offset,
        "nbf": now - 5,
        "iat": now - 5,
    });
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn application() -> Value {
    json!({
        "company": { "name": "Acme Wholesale" },
        "contact": { "firstName": "Ada", "lastName": "Lovelace", "email": "ada@acme.test" },
        "location": {
            "shippingAddress": { "address1": "1 Main St", "countryCode": "US" },
            "billingSameAsShipping": true
        }
    })
}

#[tokio::test]
async fn health_needs_no_credentials() {
    let app = app().await;
    let response = app.oneshot(request("GET", "/health", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_bearer_is_unauthorized() {
    let app = app().await;
    let (status, body) = send(&app, request("GET", "/proxy/b2b-registration", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "success": false, "message": "Missing Bearer token" }));
}

#[tokio::test]
async fn expired_token_has_its_own_message() {
    let app = app().await;
    let (status, body) = send(
        &app,
        request("GET", "/proxy/b2b-registration", Some(&token(-600)), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Session token expired");
}

#[tokio::test]
async fn missing_secret_is_a_server_fault() {
    let app = app_with(HashMap::new(), None).await;
    let (status, body) = send(
        &app,
        request("GET", "/proxy/b2b-registration", Some(&token(60)), None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Server misconfiguration");
}

#[tokio::test]
async fn pending_application_round_trip() {
    let app = app().await;
    let bearer = token(60);

    let (status, body) = send(
        &app,
        request("POST", "/proxy/b2b-registration", Some(&bearer), Some(application())),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["warnings"], json!([]));

    let (status, body) = send(&app, request("GET", "/proxy/b2b-registration", Some(&bearer), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["local"], true);
    assert_eq!(body["company"]["companyStatus"], "pending");
    assert_eq!(body["company"]["name"], "Acme Wholesale");

    let (status, body) = send(
        &app,
        request("POST", "/proxy/b2b-registration", Some(&bearer), Some(application())),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = app().await;
    let mut req = request("POST", "/proxy/b2b-registration", Some(&token(60)), None);
    *req.body_mut() = Body::from("{not json");
    req.headers_mut()
        .insert("content-type", "application/json".parse().unwrap());
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn company_status_checks_the_api_key() {
    let app = app().await;
    send(
        &app,
        request("POST", "/proxy/b2b-registration", Some(&token(60)), Some(application())),
    )
    .await;
    let uri = format!("/api/company-current-status?shopId={SHOP}&baseCustomerId={CALLER}");

    let mut req = request("GET", &uri, None, None);
    req.headers_mut().insert("x-api-key", "wrong".parse().unwrap());
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "API key not matching");

    let (status, _) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut req = request("GET", &uri, None, None);
    req.headers_mut().insert("x-api-key", API_KEY.parse().unwrap());
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["local"], true);
    assert_eq!(body["company"]["companyStatus"], "pending");

    let mut req = request(
        "POST",
        "/api/company-current-status",
        None,
        Some(json!({ "shopId": SHOP, "baseCustomerId": "gid://shopify/Customer/7" })),
    );
    req.headers_mut().insert("x-api-key", API_KEY.parse().unwrap());
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"], Value::Null);
}

#[tokio::test]
async fn companies_are_listed_for_the_merchant() {
    let app = app().await;
    send(
        &app,
        request("POST", "/proxy/b2b-registration", Some(&token(60)), Some(application())),
    )
    .await;

    let mut req = request("GET", &format!("/api/companies?shop={SHOP}&limit=10"), None, None);
    req.headers_mut().insert("x-api-key", API_KEY.parse().unwrap());
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["companies"][0]["status"], "pending");
}

#[tokio::test]
async fn location_role_failure_carries_location_and_user_errors() {
    let replies = HashMap::from([
        (
            "customer",
            json!({ "id": CALLER, "companyContactProfiles": [
                { "id": "gid://shopify/CompanyContact/1", "company": { "id": "gid://shopify/Company/1", "name": "Acme" } }
            ] }),
        ),
        (
            "companyLocationCreate",
            json!({ "companyLocation": { "id": "gid://shopify/CompanyLocation/5", "name": "Depot" }, "userErrors": [] }),
        ),
        (
            "node",
            json!({ "contactRoles": { "edges": [{ "node": { "id": "r1", "name": "Location admin" } }] } }),
        ),
        (
            "companyContactAssignRole",
            json!({ "companyContactRoleAssignment": null, "userErrors": [
                { "field": null, "message": "Role already assigned", "code": null }
            ] }),
        ),
    ]);
    let app = app_with(replies, Some(SECRET)).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/proxy/create-location",
            Some(&token(60)),
            Some(json!({ "name": "Depot", "shippingAddress": { "address1": "2 Side St" } })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["locationId"], "gid://shopify/CompanyLocation/5");
    assert_eq!(body["userErrors"][0]["message"], "Role already assigned");
}

#[tokio::test]
async fn platform_outage_is_a_bad_gateway() {
    let app = app().await;
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/proxy/invite-team-member",
            Some(&token(60)),
            Some(json!({
                "companyId": "gid://shopify/Company/1",
                "contact": { "firstName": "Grace", "lastName": "Hopper", "email": "grace@acme.test" }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
}

fn caller_profile() -> Value {
    json!({ "id": CALLER, "companyContactProfiles": [
        { "id": "gid://shopify/CompanyContact/1", "company": { "id": "gid://shopify/Company/1", "name": "Acme" } }
    ] })
}

#[tokio::test]
async fn inviting_into_a_foreign_company_is_not_found() {
    let app = app_with(HashMap::from([("customer", caller_profile())]), Some(SECRET)).await;
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/proxy/invite-team-member",
            Some(&token(60)),
            Some(json!({
                "companyId": "gid://shopify/Company/2",
                "contact": { "firstName": "Grace", "lastName": "Hopper", "email": "grace@acme.test" }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn company_locations_are_searched_by_name() {
    let replies = HashMap::from([(
        "customerLocations",
        json!({ "id": CALLER, "companyContactProfiles": [{
            "id": "gid://shopify/CompanyContact/1",
            "company": { "id": "gid://shopify/Company/1", "name": "Acme" },
            "roleAssignments": { "nodes": [
                { "id": "a1", "companyLocation": { "id": "gid://shopify/CompanyLocation/1", "name": "North Depot" } },
                { "id": "a2", "companyLocation": { "id": "gid://shopify/CompanyLocation/2", "name": "South Yard" } }
            ] }
        }] }),
    )]);
    let app = app_with(replies, Some(SECRET)).await;

    let (status, body) = send(
        &app,
        request("GET", "/proxy/company-locations?q=depot", Some(&token(60)), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["company"]["name"], "Acme");
    assert_eq!(body["locations"].as_array().unwrap().len(), 1);
    assert_eq!(body["locations"][0]["name"], "North Depot");
}

#[tokio::test]
async fn team_members_need_a_location_id() {
    let app = app().await;
    let (status, body) = send(
        &app,
        request("GET", "/proxy/location-team-members", Some(&token(60)), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn updating_a_foreign_location_is_not_found() {
    let replies = HashMap::from([
        ("customer", caller_profile()),
        (
            "locationOwner",
            json!({ "id": "gid://shopify/CompanyLocation/9", "company": { "id": "gid://shopify/Company/2" } }),
        ),
    ]);
    let app = app_with(replies, Some(SECRET)).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/proxy/update-location",
            Some(&token(60)),
            Some(json!({
                "locationId": "gid://shopify/CompanyLocation/9",
                "name": "Renamed",
                "shippingAddress": { "address1": "2 Side St", "countryCode": "US" },
                "billingSameAsShipping": true
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
