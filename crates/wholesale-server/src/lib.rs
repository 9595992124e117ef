//! Wholesale Server: axum routes over the provisioning service.
//!
//! Storefront routes under `/proxy` authenticate with the platform's
//! session token; merchant routes under `/api` with the shop's API key.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
