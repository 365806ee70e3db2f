//! Explicit service configuration, built once at startup.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use crate::domain::ConfigError;
use crate::infra::PoolConfig;

/// Time allowed for in-flight work to drain once shutdown begins.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Deployment environment. Informational only: nothing branches on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything [`crate::app::Server::new`] needs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub http_address: String,
    pub grpc_address: String,
    pub jwt_public_key_path: PathBuf,
    pub environment: Environment,
    pub pool: PoolConfig,
    pub shutdown_grace_period: Duration,
}

impl AppConfig {
    /// Build a config with default pool tuning and grace period.
    ///
    /// Listen addresses are normalised with [`normalize_listen_address`].
    pub fn new(
        database_url: SecretString,
        http_address: &str,
        grpc_address: &str,
        jwt_public_key_path: PathBuf,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url,
            http_address: normalize_listen_address("HTTP_ADDRESS", http_address)?,
            grpc_address: normalize_listen_address("GRPC_ADDRESS", grpc_address)?,
            jwt_public_key_path,
            environment,
            pool: PoolConfig::default(),
            shutdown_grace_period: SHUTDOWN_GRACE_PERIOD,
        })
    }
}

/// Accept `host:port` as well as the port-only `:port` form, which binds
/// every interface.
pub fn normalize_listen_address(key: &str, address: &str) -> Result<String, ConfigError> {
    let address = address.trim();
    let invalid = |message: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    };

    if address.is_empty() {
        return Err(invalid("listen address must not be empty"));
    }
    let normalized = match address.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => address.to_string(),
    };

    let Some((_, port)) = normalized.rsplit_once(':') else {
        return Err(invalid("listen address must include a port"));
    };
    if port.parse::<u16>().is_err() {
        return Err(invalid("port must be a number between 0 and 65535"));
    }
    Ok(normalized)
}
