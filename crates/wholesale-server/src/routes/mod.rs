//! Route table.

mod admin;
mod proxy;

use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use wholesale_core::repository::MirrorStore;
use wholesale_platform::PlatformGateway;

use crate::state::AppState;

/// `{ "success": true, ... }` around a handler's payload.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            message: None,
            body,
        }
    }

    pub fn with_message(message: &'static str, body: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            body,
        }
    }
}

pub fn create_router<G, M>(state: AppState<G, M>, enable_cors: bool) -> Router
where
    G: PlatformGateway + 'static,
    M: MirrorStore + 'static,
{
    let mut router = Router::new()
        .route("/health", get(health))
        // Storefront, session token
        .route(
            "/proxy/b2b-registration",
            get(proxy::registration_status::<G, M>).post(proxy::submit_application::<G, M>),
        )
        .route("/proxy/create-location", post(proxy::create_location::<G, M>))
        .route("/proxy/invite-team-member", post(proxy::invite_member::<G, M>))
        .route("/proxy/edit-team-member", post(proxy::edit_member::<G, M>))
        .route("/proxy/company-locations", get(proxy::company_locations::<G, M>))
        .route(
            "/proxy/location-team-members",
            get(proxy::location_team_members::<G, M>),
        )
        .route("/proxy/update-location", post(proxy::update_location::<G, M>))
        // Merchant, API key
        .route(
            "/api/company-current-status",
            get(admin::company_status_query::<G, M>).post(admin::company_status_body::<G, M>),
        )
        .route("/api/companies", get(admin::list_companies::<G, M>))
        .route(
            "/api/companies/{id}/approve",
            post(admin::approve_company::<G, M>),
        )
        .with_state(state);

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}
