//! Merchant routes, authenticated by the shop's app-issued API key.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wholesale_core::models::company::Company;
use wholesale_core::repository::{MirrorStore, Pagination};
use wholesale_platform::PlatformGateway;
use wholesale_provisioning::{ApprovalOutcome, CompanySnapshot};

use super::Success;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiKey;
use crate::state::AppState;

const MAX_PAGE: u64 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub shop_id: String,
    pub base_customer_id: String,
}

#[derive(Debug, Serialize)]
pub struct CompanyStatusBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<bool>,
    pub company: Option<CompanySnapshot>,
}

async fn company_status<G: PlatformGateway, M: MirrorStore>(
    state: &AppState<G, M>,
    api_key: &ApiKey,
    request: StatusRequest,
) -> ApiResult<Json<Success<CompanyStatusBody>>> {
    if request.shop_id.trim().is_empty() || request.base_customer_id.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing shopId or baseCustomerId".into()));
    }
    let company = state
        .service
        .application_status(&request.shop_id, &api_key.0, &request.base_customer_id)
        .await?;
    Ok(Json(Success::new(CompanyStatusBody {
        local: company.as_ref().map(|_| true),
        company,
    })))
}

pub async fn company_status_query<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    api_key: ApiKey,
    query: Result<Query<StatusRequest>, QueryRejection>,
) -> ApiResult<Json<Success<CompanyStatusBody>>> {
    let Query(request) = query?;
    company_status(&state, &api_key, request).await
}

pub async fn company_status_body<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    api_key: ApiKey,
    body: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult<Json<Success<CompanyStatusBody>>> {
    let Json(request) = body?;
    company_status(&state, &api_key, request).await
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub shop: String,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CompanyPage {
    pub companies: Vec<Company>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub async fn list_companies<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    api_key: ApiKey,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Success<CompanyPage>>> {
    let Query(query) = query?;
    state.service.authorize_api_key(&query.shop, &api_key.0).await?;

    let defaults = Pagination::default();
    let pagination = Pagination {
        offset: query.offset.unwrap_or(defaults.offset),
        limit: query.limit.unwrap_or(defaults.limit).clamp(1, MAX_PAGE),
    };
    let page = state.service.list_companies(&query.shop, pagination).await?;
    Ok(Json(Success::new(CompanyPage {
        companies: page.items,
        total: page.total,
        offset: page.offset,
        limit: page.limit,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ApproveQuery {
    pub shop: String,
    /// Permission label for the applicant; the preset's when absent.
    pub permission: Option<String>,
}

pub async fn approve_company<G: PlatformGateway, M: MirrorStore>(
    State(state): State<AppState<G, M>>,
    api_key: ApiKey,
    Path(id): Path<Uuid>,
    query: Result<Query<ApproveQuery>, QueryRejection>,
) -> ApiResult<Json<Success<ApprovalOutcome>>> {
    let Query(query) = query?;
    state.service.authorize_api_key(&query.shop, &api_key.0).await?;

    let outcome = state
        .service
        .approve_company(&query.shop, id, query.permission.as_deref())
        .await?;
    Ok(Json(Success::with_message("Company approved", outcome)))
}
