//! Session token verification.
//!
//! Storefront extensions call the app with `Authorization: Bearer <jwt>`,
//! an HS256 token signed with the app secret. `sub` identifies the
//! customer and `dest` the shop. Tokens minted by the storefront runtime
//! can carry an `nbf` slightly ahead of server time, so a first strict
//! attempt that fails on a timing claim gets exactly one more attempt
//! with a bounded leeway. Signature and format failures never retry.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::SessionTokenConfig;
use crate::error::AuthError;

/// Claims carried by a storefront session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokenClaims {
    /// Issuer: the shop's admin URL.
    #[serde(default)]
    pub iss: Option<String>,
    /// Destination: the shop domain, with or without scheme.
    pub dest: String,
    /// Audience: the app's API key.
    #[serde(default)]
    pub aud: Option<String>,
    /// Subject: the platform customer id, absent for anonymous visitors.
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub nbf: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub sid: Option<String>,
}

/// Identity established from a verified token.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    /// Platform customer id of the caller.
    pub caller_id: Option<String>,
    /// Bare shop domain, e.g. `acme.myshopify.com`.
    pub shop: String,
    pub claims: SessionTokenClaims,
}

/// Extract the raw token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Reduce a `dest` claim to a bare shop domain.
pub fn shop_domain(dest: &str) -> &str {
    let host = dest
        .strip_prefix("https://")
        .or_else(|| dest.strip_prefix("http://"))
        .unwrap_or(dest);
    host.trim_end_matches('/')
}

fn validation(config: &SessionTokenConfig, leeway: u64) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = leeway;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp"]);
    match &config.api_key {
        Some(api_key) => validation.set_audience(&[api_key]),
        None => validation.validate_aud = false,
    }
    validation
}

fn decode(
    token: &str,
    key: &DecodingKey,
    config: &SessionTokenConfig,
    leeway: u64,
) -> Result<SessionTokenClaims, JwtError> {
    jsonwebtoken::decode::<SessionTokenClaims>(token, key, &validation(config, leeway))
        .map(|data| data.claims)
}

/// Failures caused by `exp`/`nbf` against the local clock.
fn is_timing_failure(err: &JwtError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature
    )
}

fn classify(err: &JwtError) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
        _ => AuthError::TokenInvalid(err.to_string()),
    }
}

/// Verify a session token: strict first, then once more with
/// `clock_tolerance_secs` of leeway if and only if the strict attempt
/// failed on a timing claim.
pub fn verify_session_token(
    token: &str,
    config: &SessionTokenConfig,
) -> Result<VerifiedSession, AuthError> {
    let secret = config
        .api_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            error!("session token secret is not configured");
            AuthError::ServerMisconfigured
        })?;
    let key = DecodingKey::from_secret(secret.as_bytes());

    let claims = match decode(token, &key, config, 0) {
        Ok(claims) => {
            debug!("session token verified without tolerance");
            claims
        }
        Err(first) if is_timing_failure(&first) => {
            warn!(error = %first, "strict session token check failed on a timing claim, retrying with tolerance");
            match decode(token, &key, config, config.clock_tolerance_secs) {
                Ok(claims) => {
                    warn!(
                        tolerance_secs = config.clock_tolerance_secs,
                        "session token accepted with clock tolerance"
                    );
                    claims
                }
                Err(second) => {
                    error!(error = %second, "session token rejected even with clock tolerance");
                    return Err(classify(&second));
                }
            }
        }
        Err(first) => {
            warn!(error = %first, "session token rejected");
            return Err(classify(&first));
        }
    };

    Ok(VerifiedSession {
        caller_id: claims.sub.clone().filter(|s| !s.is_empty()),
        shop: shop_domain(&claims.dest).to_string(),
        claims,
    })
}

/// Stateless verifier handed to the request layer.
#[derive(Debug, Clone)]
pub struct SessionVerifier {
    config: SessionTokenConfig,
}

impl SessionVerifier {
    pub fn new(config: SessionTokenConfig) -> Self {
        Self { config }
    }

    /// Verify the value of an `Authorization` header. A missing or
    /// non-bearer header fails before any verification is attempted.
    pub fn verify_header(&self, header: Option<&str>) -> Result<VerifiedSession, AuthError> {
        let token = bearer_token(header)?;
        verify_session_token(token, &self.config)
    }
}
