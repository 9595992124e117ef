//! Per-tenant credentials for platform calls.

/// The shop a call is made for and the stored offline access token used
/// to authenticate it.
#[derive(Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub shop: String,
    pub access_token: String,
}

impl TenantContext {
    pub fn new(shop: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            access_token: access_token.into(),
        }
    }
}

impl std::fmt::Debug for TenantContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantContext")
            .field("shop", &self.shop)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_token() {
        let ctx = TenantContext::new("acme.myshopify.com", "shpat_secret");
        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("acme.myshopify.com"));
        assert!(!rendered.contains("shpat_secret"));
    }
}
