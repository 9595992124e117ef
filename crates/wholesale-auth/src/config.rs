//! Session token verification configuration.

/// Default clock-skew tolerance for the retry attempt, in seconds.
pub const DEFAULT_CLOCK_TOLERANCE_SECS: u64 = 120;

/// Configuration for verifying storefront session tokens.
#[derive(Clone)]
pub struct SessionTokenConfig {
    /// Shared app secret the platform signs session tokens with (HS256).
    /// `None` or empty means the server is misconfigured.
    pub api_secret: Option<String>,
    /// App API key; when set, the token's `aud` claim must match it.
    pub api_key: Option<String>,
    /// Leeway applied on the second attempt when the first one failed
    /// on a timing claim.
    pub clock_tolerance_secs: u64,
}

impl Default for SessionTokenConfig {
    fn default() -> Self {
        Self {
            api_secret: None,
            api_key: None,
            clock_tolerance_secs: DEFAULT_CLOCK_TOLERANCE_SECS,
        }
    }
}

impl std::fmt::Debug for SessionTokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenConfig")
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("api_key", &self.api_key)
            .field("clock_tolerance_secs", &self.clock_tolerance_secs)
            .finish()
    }
}
