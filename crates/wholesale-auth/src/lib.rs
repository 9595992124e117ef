//! Wholesale Auth: bearer extraction and session token verification
//! with a single bounded clock-skew retry.

pub mod config;
pub mod error;
pub mod token;

pub use config::SessionTokenConfig;
pub use error::AuthError;
pub use token::{SessionTokenClaims, SessionVerifier, VerifiedSession};
