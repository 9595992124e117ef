//! Resolving shops to platform credentials.

mod common;

use common::*;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use wholesale_core::error::WholesaleError;
use wholesale_core::models::tenant_session::CreateTenantSession;
use wholesale_core::repository::{MirrorStore, TenantSessionRepository};
use wholesale_db::SurrealMirror;
use wholesale_provisioning::{ProvisioningService, TenantContextResolver};

async fn empty_mirror() -> SurrealMirror<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    wholesale_db::run_migrations(&db).await.unwrap();
    SurrealMirror::new(db)
}

async fn with_token(store: &SurrealMirror<Db>, shop: &str, token: Option<&str>) {
    store
        .sessions()
        .create(CreateTenantSession {
            shop: shop.into(),
            access_token: token.map(str::to_string),
            api_key: Some(API_KEY.into()),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn stored_session_resolves_to_a_context() {
    let store = empty_mirror().await;
    with_token(&store, SHOP, Some("shpat_live")).await;

    let ctx = TenantContextResolver::new(store.sessions())
        .resolve(SHOP)
        .await
        .unwrap();
    assert_eq!(ctx.shop, SHOP);
    assert_eq!(ctx.access_token, "shpat_live");
}

#[tokio::test]
async fn unknown_shop_is_not_found_and_nothing_is_created() {
    let store = empty_mirror().await;

    let err = TenantContextResolver::new(store.sessions())
        .resolve("unknown.myshopify.com")
        .await
        .unwrap_err();

    assert!(matches!(err, WholesaleError::NotFound { ref entity, .. } if entity == "tenant_session"));
    let session = store
        .sessions()
        .find_by_shop("unknown.myshopify.com")
        .await
        .unwrap();
    assert!(session.is_none());
}

#[tokio::test]
async fn session_without_token_is_a_missing_credential() {
    let store = empty_mirror().await;
    with_token(&store, SHOP, None).await;

    let err = TenantContextResolver::new(store.sessions())
        .resolve(SHOP)
        .await
        .unwrap_err();
    assert!(matches!(err, WholesaleError::TenantCredentialMissing { ref shop } if shop == SHOP));
}

#[tokio::test]
async fn blank_token_is_a_missing_credential() {
    let store = empty_mirror().await;
    with_token(&store, SHOP, Some("   ")).await;

    let err = TenantContextResolver::new(store.sessions())
        .resolve(SHOP)
        .await
        .unwrap_err();
    assert!(matches!(err, WholesaleError::TenantCredentialMissing { .. }));

    let session = store.sessions().find_by_shop(SHOP).await.unwrap().unwrap();
    assert_eq!(session.access_token.as_deref(), Some("   "));
}

#[tokio::test]
async fn api_key_must_match_the_stored_one() {
    let store = empty_mirror().await;
    with_token(&store, SHOP, Some("shpat_live")).await;
    let resolver = TenantContextResolver::new(store.sessions());

    assert!(resolver.authorize_api_key(SHOP, API_KEY).await.is_ok());
    assert!(matches!(
        resolver.authorize_api_key(SHOP, "wrong").await,
        Err(WholesaleError::AuthenticationFailed { .. })
    ));
    assert!(matches!(
        resolver.authorize_api_key("unknown.myshopify.com", API_KEY).await,
        Err(WholesaleError::AuthenticationFailed { .. })
    ));
}

#[tokio::test]
async fn pipelines_stop_before_the_platform_without_credentials() {
    let store = empty_mirror().await;
    with_token(&store, SHOP, None).await;
    let gateway = FakeGateway::default();
    let service = ProvisioningService::new(gateway.clone(), store);

    let err = service
        .list_company_locations(SHOP, CALLER, None)
        .await
        .unwrap_err();

    assert!(matches!(err, WholesaleError::TenantCredentialMissing { .. }));
    assert!(gateway.calls().is_empty());
}
