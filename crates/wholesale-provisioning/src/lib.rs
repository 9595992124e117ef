//! Wholesale Provisioning: the sagas that turn a storefront application
//! into a company on the commerce platform and keep the local mirror in
//! step with it.
//!
//! Every pipeline follows one failure policy. A rejected *creation* step
//! aborts with nothing written. A failed *secondary* step after an entity
//! already exists remotely is recorded as a warning and the pipeline
//! carries on. Adding a location is the exception: its role assignment
//! failure is reported as an error once the location has been mirrored.

pub mod input;
pub mod pipeline;
pub mod remote;
pub mod roles;
pub mod saga;
pub mod service;
pub mod tenant;

pub use pipeline::{
    ApplicationOutcome, ApprovalOutcome, CompanyLocations, CompanyRef, CompanySnapshot,
    EditOutcome, ExistingCompany, InviteOutcome, LocationOutcome, LocationSummary,
    LocationUpdateOutcome, TeamMember, TeamPage,
};
pub use saga::{Policy, Saga, SagaWarning, Step, StepError, StepOutcome};
pub use service::ProvisioningService;
pub use tenant::TenantContextResolver;
