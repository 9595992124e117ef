//! API error type and its JSON rendering.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use wholesale_auth::AuthError;
use wholesale_core::error::{RemoteUserError, WholesaleError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Domain(#[from] WholesaleError),

    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Body of every failed response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_errors: Vec<RemoteUserError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) if e.is_server_fault() => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(e) => match e {
                WholesaleError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
                WholesaleError::NotFound { .. } => StatusCode::NOT_FOUND,
                WholesaleError::Validation { .. }
                | WholesaleError::RemoteRejected { .. }
                | WholesaleError::RoleAssignmentFailed { .. } => StatusCode::BAD_REQUEST,
                WholesaleError::AlreadyExists { .. } | WholesaleError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
                WholesaleError::RemoteTransport(_) => StatusCode::BAD_GATEWAY,
                WholesaleError::TenantCredentialMissing { .. }
                | WholesaleError::Database(_)
                | WholesaleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Domain(WholesaleError::AuthenticationFailed { reason }) => reason.clone(),
            ApiError::Domain(WholesaleError::Validation { message }) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        let message = self.message();
        let (user_errors, location_id) = match self {
            ApiError::Domain(WholesaleError::RemoteRejected { errors, .. }) => (errors, None),
            ApiError::Domain(WholesaleError::RoleAssignmentFailed { location_id, errors }) => {
                (errors, Some(location_id))
            }
            _ => (Vec::new(), None),
        };

        let body = ErrorResponse {
            success: false,
            message,
            user_errors,
            location_id,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
