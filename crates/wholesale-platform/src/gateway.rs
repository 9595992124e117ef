//! Platform gateway trait and its reqwest implementation.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};
use wholesale_core::error::{WholesaleError, WholesaleResult};

use crate::config::PlatformConfig;
use crate::context::TenantContext;
use crate::operations::Operation;

/// Outcome of one GraphQL call.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    /// Endpoint unreachable, non-2xx, or an unreadable body.
    TransportFailure { status: Option<u16>, body: String },
    /// Top-level GraphQL `errors`: the query layer refused the call.
    ProtocolErrors { messages: Vec<String> },
    /// The `data` object. May still embed operation-specific `userErrors`.
    Data { payload: Value },
}

impl OperationResult {
    /// The `data` payload, or the transport/protocol failure as an error.
    pub fn into_data(self, operation: &Operation) -> WholesaleResult<Value> {
        match self {
            OperationResult::Data { payload } => Ok(payload),
            OperationResult::TransportFailure { status, body } => {
                Err(WholesaleError::RemoteTransport(match status {
                    Some(status) => format!("{} returned HTTP {status}: {body}", operation.name),
                    None => format!("{} failed: {body}", operation.name),
                }))
            }
            OperationResult::ProtocolErrors { messages } => Err(WholesaleError::RemoteTransport(
                format!("{} rejected: {}", operation.name, messages.join("; ")),
            )),
        }
    }
}

/// Executes Admin GraphQL operations on behalf of a tenant.
///
/// Implementations attempt every call exactly once.
pub trait PlatformGateway: Send + Sync {
    fn execute(
        &self,
        ctx: &TenantContext,
        operation: &Operation,
        variables: Value,
    ) -> impl Future<Output = OperationResult> + Send;
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Gateway over HTTPS using a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: PlatformConfig,
}

impl HttpGateway {
    pub fn new(config: PlatformConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

impl PlatformGateway for HttpGateway {
    async fn execute(
        &self,
        ctx: &TenantContext,
        operation: &Operation,
        variables: Value,
    ) -> OperationResult {
        let url = self.config.endpoint(&ctx.shop);
        debug!(shop = %ctx.shop, operation = operation.name, "Calling platform");

        let response = match self
            .client
            .post(&url)
            .header("X-Shopify-Access-Token", &ctx.access_token)
            .json(&json!({ "query": operation.document, "variables": variables }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(shop = %ctx.shop, operation = operation.name, error = %e, "Platform unreachable");
                return OperationResult::TransportFailure {
                    status: None,
                    body: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return OperationResult::TransportFailure {
                    status: Some(status.as_u16()),
                    body: e.to_string(),
                };
            }
        };

        if !status.is_success() {
            warn!(
                shop = %ctx.shop,
                operation = operation.name,
                status = status.as_u16(),
                "Platform returned non-success status"
            );
            return OperationResult::TransportFailure {
                status: Some(status.as_u16()),
                body,
            };
        }

        let parsed: GraphQlResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(operation = operation.name, error = %e, "Unreadable platform response");
                return OperationResult::TransportFailure {
                    status: Some(status.as_u16()),
                    body,
                };
            }
        };

        match (parsed.errors, parsed.data) {
            (Some(errors), _) if !errors.is_empty() => {
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                warn!(operation = operation.name, ?messages, "Platform rejected operation");
                OperationResult::ProtocolErrors { messages }
            }
            (_, Some(payload)) if !payload.is_null() => OperationResult::Data { payload },
            _ => OperationResult::ProtocolErrors {
                messages: vec!["response carried no data".into()],
            },
        }
    }
}
