//! API configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use core_kernel::{Currency, Timezone};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// The single origin allowed to call the API from a browser
    pub allowed_origin: String,
    /// Headless print endpoint that turns invoice HTML into PDF
    pub print_service_url: String,
    pub print_service_timeout_secs: u64,
    /// Root directory for stored invoice documents
    pub storage_root: PathBuf,
    /// ISO code of the currency every price is quoted in
    pub currency: String,
    /// IANA name of the business timezone
    pub timezone: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/fieldops".to_string(),
            log_level: "info".to_string(),
            allowed_origin: "http://localhost:3000".to_string(),
            print_service_url: "http://localhost:3001/pdf".to_string(),
            print_service_timeout_secs: 30,
            storage_root: PathBuf::from("./storage"),
            currency: "USD".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    ///
    /// Unset variables keep their default value.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn currency(&self) -> Result<Currency, config::ConfigError> {
        self.currency
            .parse()
            .map_err(|e| config::ConfigError::Message(format!("API_CURRENCY: {}", e)))
    }

    pub fn timezone(&self) -> Result<Timezone, config::ConfigError> {
        Timezone::parse(&self.timezone)
            .ok_or_else(|| config::ConfigError::Message(format!("API_TIMEZONE: unknown timezone {}", self.timezone)))
    }

    pub fn print_service_timeout(&self) -> Duration {
        Duration::from_secs(self.print_service_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.currency().unwrap(), Currency::USD);
        assert!(config.timezone().is_ok());
    }

    #[test]
    fn test_bad_timezone_is_reported() {
        let config = ApiConfig {
            timezone: "Mars/Olympus".into(),
            ..ApiConfig::default()
        };
        assert!(config.timezone().is_err());
    }
}
