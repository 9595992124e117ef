//! Storefront routes. The shop and the caller come from the session
//! token, never from the body.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::info;
use wholesale_core::models::company::CompanyStatus;
use wholesale_core::repository::MirrorStore;
use wholesale_platform::PlatformGateway;
use wholesale_provisioning::input::{
    ApplicationInput, EditMemberInput, InviteMemberInput, LocationUpdateInput, NewLocationInput,
};
use wholesale_provisioning::{
    ApplicationOutcome, CompanyLocations, EditOutcome, ExistingCompany, InviteOutcome,
    LocationOutcome, LocationUpdateOutcome, TeamPage,
};

use super::Success;
use crate::error::ApiResult;
use crate::extract::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RegistrationStatus {
    Found(ExistingCompany),
    Missing { company: Option<()> },
}

pub async fn registration_status<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    session: Session,
) -> ApiResult<Json<Success<RegistrationStatus>>> {
    let caller_id = session.caller_id()?;
    let status = match state
        .service
        .check_existing_company(session.shop(), caller_id)
        .await?
    {
        Some(existing) => RegistrationStatus::Found(existing),
        None => RegistrationStatus::Missing { company: None },
    };
    Ok(Json(Success::new(status)))
}

pub async fn submit_application<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    session: Session,
    body: Result<Json<ApplicationInput>, JsonRejection>,
) -> ApiResult<Json<Success<ApplicationOutcome>>> {
    let caller_id = session.caller_id()?;
    let Json(input) = body?;
    info!(shop = session.shop(), caller_id, "Application received");

    let outcome = state
        .service
        .submit_application(session.shop(), caller_id, input)
        .await?;
    let message = match outcome.status {
        CompanyStatus::Pending => "Request submitted successfully.",
        _ if outcome.warnings.is_empty() => "Company created and customer assigned as main contact",
        _ => "Company created with warnings",
    };
    Ok(Json(Success::with_message(message, outcome)))
}

pub async fn create_location<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    session: Session,
    body: Result<Json<NewLocationInput>, JsonRejection>,
) -> ApiResult<Json<Success<LocationOutcome>>> {
    let caller_id = session.caller_id()?;
    let Json(input) = body?;
    let outcome = state
        .service
        .create_location(session.shop(), caller_id, input)
        .await?;
    Ok(Json(Success::new(outcome)))
}

pub async fn invite_member<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    session: Session,
    body: Result<Json<InviteMemberInput>, JsonRejection>,
) -> ApiResult<Json<Success<InviteOutcome>>> {
    let caller_id = session.caller_id()?;
    let Json(input) = body?;
    let outcome = state
        .service
        .invite_member(session.shop(), caller_id, input)
        .await?;
    Ok(Json(Success::new(outcome)))
}

pub async fn edit_member<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    session: Session,
    body: Result<Json<EditMemberInput>, JsonRejection>,
) -> ApiResult<Json<Success<EditOutcome>>> {
    let caller_id = session.caller_id()?;
    let Json(input) = body?;
    let outcome = state
        .service
        .edit_member(session.shop(), caller_id, input)
        .await?;
    Ok(Json(Success::new(outcome)))
}

#[derive(Debug, Deserialize)]
pub struct LocationSearch {
    pub q: Option<String>,
}

pub async fn company_locations<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    session: Session,
    query: Result<Query<LocationSearch>, QueryRejection>,
) -> ApiResult<Json<Success<CompanyLocations>>> {
    let caller_id = session.caller_id()?;
    let Query(search) = query?;
    let listed = state
        .service
        .list_company_locations(session.shop(), caller_id, search.q.as_deref())
        .await?;
    Ok(Json(Success::new(listed)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamQuery {
    pub location_id: String,
    pub first: Option<u32>,
    pub after: Option<String>,
}

pub async fn location_team_members<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    session: Session,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> ApiResult<Json<Success<TeamPage>>> {
    let caller_id = session.caller_id()?;
    let Query(team) = query?;
    let page = state
        .service
        .location_members(
            session.shop(),
            caller_id,
            &team.location_id,
            team.first,
            team.after.as_deref().filter(|a| !a.is_empty()),
        )
        .await?;
    Ok(Json(Success::new(page)))
}

pub async fn update_location<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    session: Session,
    body: Result<Json<LocationUpdateInput>, JsonRejection>,
) -> ApiResult<Json<Success<LocationUpdateOutcome>>> {
    let caller_id = session.caller_id()?;
    let Json(input) = body?;
    let outcome = state
        .service
        .update_location(session.shop(), caller_id, input)
        .await?;
    Ok(Json(Success::new(outcome)))
}
