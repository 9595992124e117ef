//! A small saga runner.
//!
//! Steps report `Result<T, StepError>`. The runner applies the step's
//! [`Policy`], logs the outcome and collects warnings, so pipelines read
//! as a straight sequence of `require`/`tolerate` calls.

use serde::Serialize;
use tracing::{error, info, warn};
use wholesale_core::error::{RemoteUserError, WholesaleError};

/// Named steps shared by the pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    ValidateInput,
    CheckExisting,
    ResolveTenant,
    CreateCompany,
    AssignContact,
    AssignMainContact,
    ResolveCallerCompany,
    CheckOwnership,
    CreateLocation,
    UpdateLocation,
    AssignAddress,
    FetchLocations,
    FetchMembers,
    CreateContact,
    UpdateContact,
    FetchRoles,
    ResolveRole,
    RevokeRole,
    AssignRole,
    MirrorWrite,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::ValidateInput => "validate_input",
            Step::CheckExisting => "check_existing",
            Step::ResolveTenant => "resolve_tenant",
            Step::CreateCompany => "create_company",
            Step::AssignContact => "assign_contact",
            Step::AssignMainContact => "assign_main_contact",
            Step::ResolveCallerCompany => "resolve_caller_company",
            Step::CheckOwnership => "check_ownership",
            Step::CreateLocation => "create_location",
            Step::UpdateLocation => "update_location",
            Step::AssignAddress => "assign_address",
            Step::FetchLocations => "fetch_locations",
            Step::FetchMembers => "fetch_members",
            Step::CreateContact => "create_contact",
            Step::UpdateContact => "update_contact",
            Step::FetchRoles => "fetch_roles",
            Step::ResolveRole => "resolve_role",
            Step::RevokeRole => "revoke_role",
            Step::AssignRole => "assign_role",
            Step::MirrorWrite => "mirror_write",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a failed step does to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Stop the pipeline and fail the request.
    AbortOnFailure,
    /// Record a warning and continue.
    WarnOnFailure,
}

/// Why a step failed.
#[derive(Debug)]
pub enum StepError {
    /// The platform answered with business `userErrors`.
    Rejected(Vec<RemoteUserError>),
    /// Anything else: transport, protocol, malformed payload, storage.
    Failed(WholesaleError),
}

impl StepError {
    pub fn message(&self) -> String {
        match self {
            StepError::Rejected(errors) => errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            StepError::Failed(err) => err.to_string(),
        }
    }

    /// Error reported to the caller when the step was fatal.
    pub fn into_error(self, step: Step) -> WholesaleError {
        match self {
            StepError::Rejected(errors) => WholesaleError::RemoteRejected {
                step: step.as_str().to_string(),
                errors,
            },
            StepError::Failed(err) => err,
        }
    }
}

impl From<WholesaleError> for StepError {
    fn from(err: WholesaleError) -> Self {
        StepError::Failed(err)
    }
}

/// A tolerated failure, returned to the caller next to a success.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SagaWarning {
    pub step: Step,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_errors: Vec<RemoteUserError>,
}

impl SagaWarning {
    fn from_step_error(step: Step, err: StepError) -> Self {
        let message = err.message();
        let user_errors = match err {
            StepError::Rejected(errors) => errors,
            StepError::Failed(_) => Vec::new(),
        };
        Self {
            step,
            message,
            user_errors,
        }
    }
}

/// Outcome of one step after its policy was applied.
#[derive(Debug)]
pub enum StepOutcome<T> {
    Succeeded(T),
    Fatal(WholesaleError),
    Partial(SagaWarning),
}

/// Run state of one pipeline invocation.
#[derive(Debug)]
pub struct Saga {
    pipeline: &'static str,
    shop: String,
    warnings: Vec<SagaWarning>,
}

impl Saga {
    pub fn new(pipeline: &'static str, shop: &str) -> Self {
        Self {
            pipeline,
            shop: shop.to_string(),
            warnings: Vec::new(),
        }
    }

    /// Apply `policy` to a step's result.
    pub fn record<T>(
        &mut self,
        step: Step,
        policy: Policy,
        result: Result<T, StepError>,
    ) -> StepOutcome<T> {
        match (result, policy) {
            (Ok(value), _) => {
                info!(pipeline = self.pipeline, shop = %self.shop, step = %step, "Step succeeded");
                StepOutcome::Succeeded(value)
            }
            (Err(err), Policy::AbortOnFailure) => {
                error!(
                    pipeline = self.pipeline,
                    shop = %self.shop,
                    step = %step,
                    error = %err.message(),
                    "Step failed, aborting"
                );
                StepOutcome::Fatal(err.into_error(step))
            }
            (Err(err), Policy::WarnOnFailure) => {
                let warning = SagaWarning::from_step_error(step, err);
                warn!(
                    pipeline = self.pipeline,
                    shop = %self.shop,
                    step = %step,
                    error = %warning.message,
                    "Step failed, continuing"
                );
                self.warnings.push(warning.clone());
                StepOutcome::Partial(warning)
            }
        }
    }

    /// A step the pipeline cannot continue without.
    pub fn require<T>(&mut self, step: Step, result: Result<T, StepError>) -> Result<T, WholesaleError> {
        match self.record(step, Policy::AbortOnFailure, result) {
            StepOutcome::Succeeded(value) => Ok(value),
            StepOutcome::Fatal(err) => Err(err),
            StepOutcome::Partial(warning) => Err(WholesaleError::Internal(warning.message)),
        }
    }

    /// A secondary step; failure becomes a warning.
    pub fn tolerate<T>(&mut self, step: Step, result: Result<T, StepError>) -> Option<T> {
        match self.record(step, Policy::WarnOnFailure, result) {
            StepOutcome::Succeeded(value) => Some(value),
            StepOutcome::Fatal(_) | StepOutcome::Partial(_) => None,
        }
    }

    /// Record a warning that did not come from a failed call, such as a
    /// role label that matched nothing.
    pub fn warn(&mut self, step: Step, message: impl Into<String>) {
        let message = message.into();
        warn!(pipeline = self.pipeline, shop = %self.shop, step = %step, %message, "Step skipped");
        self.warnings.push(SagaWarning {
            step,
            message,
            user_errors: Vec::new(),
        });
    }

    pub fn warnings(&self) -> &[SagaWarning] {
        &self.warnings
    }

    pub fn finish(self) -> Vec<SagaWarning> {
        info!(
            pipeline = self.pipeline,
            shop = %self.shop,
            warnings = self.warnings.len(),
            "Pipeline finished"
        );
        self.warnings
    }
}
