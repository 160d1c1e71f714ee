use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

/// Value shipped in `Settings::default()`. Never accepted as a real secret.
pub const PLACEHOLDER_SECRET: &str = "change-me-in-production";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Signs impersonation tokens.
    pub jwt_secret: String,
    /// Bearer token for the admin endpoints.
    pub admin_token: String,
    pub impersonation_ttl_minutes: i64,
}

impl AuthConfig {
    /// False while either secret is empty or still the placeholder.
    pub fn is_configured(&self) -> bool {
        [&self.jwt_secret, &self.admin_token]
            .iter()
            .all(|secret| !secret.trim().is_empty() && secret.as_str() != PLACEHOLDER_SECRET)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GatewayConfig {
    /// Expected value of the `asaas-access-token` header. Unchecked when unset.
    pub webhook_token: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://tuition.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.impersonation_ttl_minutes", 10)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with TUITION__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("TUITION").separator("__"))

            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.auth.is_configured() {
            return Err(ConfigError::Message(
                "auth.jwt_secret and auth.admin_token must be set to non-placeholder values".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://tuition.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                jwt_secret: PLACEHOLDER_SECRET.to_string(),
                admin_token: PLACEHOLDER_SECRET.to_string(),
                impersonation_ttl_minutes: 10,
            },
            gateway: GatewayConfig {
                webhook_token: None,
            },
        }
    }
}
