//! Wholesale Platform: the transport and protocol layer for the commerce
//! platform's Admin GraphQL API.
//!
//! The gateway only distinguishes transport failures, protocol errors and
//! data. Business `userErrors` embedded in a mutation's payload are left
//! for callers to interpret through the typed decoders in [`payload`].

pub mod config;
pub mod context;
pub mod gateway;
pub mod operations;
pub mod payload;

pub use config::PlatformConfig;
pub use context::TenantContext;
pub use gateway::{HttpGateway, OperationResult, PlatformGateway};
pub use operations::Operation;
