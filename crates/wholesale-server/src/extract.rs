//! Request extractors for the two ways callers authenticate.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use wholesale_auth::{SessionVerifier, VerifiedSession};
use wholesale_core::error::WholesaleError;

use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// A storefront caller identified by a verified session token.
#[derive(Debug, Clone)]
pub struct Session(pub VerifiedSession);

impl Session {
    pub fn shop(&self) -> &str {
        &self.0.shop
    }

    /// Customer the token was issued for. Storefront routes need one.
    pub fn caller_id(&self) -> Result<&str, ApiError> {
        self.0
            .caller_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ApiError::Domain(WholesaleError::Validation {
                    message: "Missing customer ID".into(),
                })
            })
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Arc<SessionVerifier>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let verifier = Arc::<SessionVerifier>::from_ref(state);
        Ok(Session(verifier.verify_header(header)?))
    }
}

/// The raw `x-api-key` header. Checked against the shop by the handler,
/// since the shop comes from the query string.
#[derive(Debug, Clone)]
pub struct ApiKey(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| ApiKey(v.trim().to_string()))
            .filter(|key| !key.0.is_empty())
            .ok_or_else(|| {
                ApiError::Domain(WholesaleError::AuthenticationFailed {
                    reason: "API key not matching".into(),
                })
            })
    }
}
