//! Domain models for wholesale account provisioning.
//!
//! Company is the aggregate root of the local mirror. Locations and
//! company contacts hang off a company; members hang off a
//! (location, contact) pair.

pub mod address;
pub mod company;
pub mod contact;
pub mod location;
pub mod member;
pub mod preset;
pub mod settings;
pub mod tenant_session;
