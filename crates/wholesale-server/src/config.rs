//! Server configuration, read from `WHOLESALE_*` environment variables.

use thiserror::Error;
use wholesale_auth::SessionTokenConfig;
use wholesale_db::DbConfig;
use wholesale_platform::PlatformConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub session: SessionTokenConfig,
    pub platform: PlatformConfig,
    pub db: DbConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            enable_cors: true,
            session: SessionTokenConfig::default(),
            platform: PlatformConfig::default(),
            db: DbConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by whatever is set in the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("WHOLESALE_HOST") {
            config.host = host;
        }
        if let Some(port) = var("WHOLESALE_PORT") {
            config.port = parse("WHOLESALE_PORT", port)?;
        }
        if let Some(cors) = var("WHOLESALE_ENABLE_CORS") {
            config.enable_cors = parse("WHOLESALE_ENABLE_CORS", cors)?;
        }

        config.session.api_secret = var("WHOLESALE_API_SECRET");
        config.session.api_key = var("WHOLESALE_API_KEY");
        if let Some(secs) = var("WHOLESALE_CLOCK_TOLERANCE_SECS") {
            config.session.clock_tolerance_secs = parse("WHOLESALE_CLOCK_TOLERANCE_SECS", secs)?;
        }

        if let Some(version) = var("WHOLESALE_PLATFORM_API_VERSION") {
            config.platform.api_version = version;
        }
        if let Some(scheme) = var("WHOLESALE_PLATFORM_SCHEME") {
            config.platform.scheme = scheme;
        }
        if let Some(secs) = var("WHOLESALE_PLATFORM_TIMEOUT_SECS") {
            config.platform.timeout_secs = parse("WHOLESALE_PLATFORM_TIMEOUT_SECS", secs)?;
        }

        if let Some(endpoint) = var("WHOLESALE_DB_URL") {
            config.db.endpoint = endpoint;
        }
        if let Some(ns) = var("WHOLESALE_DB_NAMESPACE") {
            config.db.namespace = ns;
        }
        if let Some(db) = var("WHOLESALE_DB_DATABASE") {
            config.db.database = db;
        }
        if let Some(user) = var("WHOLESALE_DB_USERNAME") {
            config.db.username = user;
        }
        if let Some(password) = var("WHOLESALE_DB_PASSWORD") {
            config.db.password = password;
        }
        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
