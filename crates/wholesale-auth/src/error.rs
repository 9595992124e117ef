//! Session token error types.

use thiserror::Error;
use wholesale_core::error::WholesaleError;

/// Why a request could not be authenticated. Display strings are shown
/// to callers verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Bearer token")]
    MissingToken,

    #[error("Server misconfiguration")]
    ServerMisconfigured,

    #[error("Session token expired")]
    TokenExpired,

    #[error("Session token not yet valid (nbf)")]
    TokenNotYetValid,

    /// Bad signature, malformed token or missing claims. The detail is
    /// logged, not shown.
    #[error("Invalid session token")]
    TokenInvalid(String),
}

impl AuthError {
    /// Misconfiguration is a server fault; everything else is the
    /// caller's.
    pub fn is_server_fault(&self) -> bool {
        matches!(self, AuthError::ServerMisconfigured)
    }
}

impl From<AuthError> for WholesaleError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ServerMisconfigured => WholesaleError::Internal(err.to_string()),
            AuthError::MissingToken
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid
            | AuthError::TokenInvalid(_) => WholesaleError::AuthenticationFailed {
                reason: err.to_string(),
            },
        }
    }
}
