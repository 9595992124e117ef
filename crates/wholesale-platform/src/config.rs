//! Platform API configuration.

pub const DEFAULT_API_VERSION: &str = "2025-07";

/// Where and how to reach a tenant's Admin GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Admin API version segment, e.g. `2025-07`.
    pub api_version: String,
    /// `https` in production; tests point the gateway at a local `http`
    /// stub.
    pub scheme: String,
    /// Per-request timeout. The gateway never retries.
    pub timeout_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.into(),
            scheme: "https".into(),
            timeout_secs: 30,
        }
    }
}

impl PlatformConfig {
    /// GraphQL endpoint for one shop.
    pub fn endpoint(&self, shop: &str) -> String {
        format!(
            "{}://{}/admin/api/{}/graphql.json",
            self.scheme, shop, self.api_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_per_shop_and_version() {
        let config = PlatformConfig::default();
        assert_eq!(
            config.endpoint("acme.myshopify.com"),
            "https://acme.myshopify.com/admin/api/2025-07/graphql.json"
        );
    }
}
