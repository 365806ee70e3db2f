//! Application error types with proper error chaining.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DatabaseError {
    #[error("Invalid database configuration: {0}")]
    Configuration(String),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Transaction failed: {0}")]
    Transaction(String),
    #[error("Tenant context failed: {0}")]
    TenantContext(String),
    #[error("Query execution failed: {0}")]
    Query(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Duplicate record: {0}")]
    Duplicate(String),
    #[error("Pool exhausted: {0}")]
    PoolExhausted(String),
    #[error("Migration failed: {0}")]
    Migration(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("Unable to load key file '{path}': {message}")]
    KeyFile { path: String, message: String },
}

/// The two network endpoints owned by the lifecycle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    Http,
    Grpc,
}

impl fmt::Display for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listener::Http => f.write_str("HTTP"),
            Listener::Grpc => f.write_str("gRPC"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{listener} listener failed to bind {address}: {message}")]
    Bind {
        listener: Listener,
        address: String,
        message: String,
    },
    #[error("{listener} server error: {message}")]
    Serve { listener: Listener, message: String },
    #[error("Server is already running")]
    AlreadyRunning,
    #[error("Graceful shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),
    #[error("{listener} task failed: {message}")]
    Join { listener: Listener, message: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Authorization denied: {0}")]
    Authorization(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted("Pool timed out".to_string()),
            sqlx::Error::Configuration(e) => DatabaseError::Configuration(e.to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.code().is_some_and(|code| code == "23505") {
                    return DatabaseError::Duplicate(db_err.message().to_string());
                }
                DatabaseError::Query(db_err.message().to_string())
            }
            _ => DatabaseError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(DatabaseError::from(err))
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::Migration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_conversions() {
        let not_found = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(not_found, DatabaseError::NotFound(_)));

        let pool_timeout = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(pool_timeout, DatabaseError::PoolExhausted(_)));

        // Simulate fallback for unknown errors
        let generic = DatabaseError::from(sqlx::Error::WorkerCrashed);
        assert!(matches!(generic, DatabaseError::Query(_)));
    }

    #[test]
    fn test_sqlx_error_into_app_error() {
        let app_err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(
            app_err,
            AppError::Database(DatabaseError::PoolExhausted(_))
        ));
    }

    #[test]
    fn test_migrate_error_conversion() {
        let mig_err = sqlx::migrate::MigrateError::VersionMissing(1);
        match DatabaseError::from(mig_err) {
            DatabaseError::Migration(msg) => {
                assert!(msg.contains("migration 1 was previously applied"));
            }
            other => panic!("Expected DatabaseError::Migration, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<String>("invalid json").unwrap_err();
        let app_err = AppError::from(json_err);
        assert!(matches!(app_err, AppError::Serialization(_)));
    }

    #[test]
    fn test_database_error_display() {
        let err = DatabaseError::Configuration("bad url".to_string());
        assert_eq!(err.to_string(), "Invalid database configuration: bad url");

        let err = DatabaseError::Transaction("begin".to_string());
        assert_eq!(err.to_string(), "Transaction failed: begin");

        let err = DatabaseError::TenantContext("set_config".to_string());
        assert_eq!(err.to_string(), "Tenant context failed: set_config");

        let err = DatabaseError::PoolExhausted("no connections".to_string());
        assert_eq!(err.to_string(), "Pool exhausted: no connections");
    }

    #[test]
    fn test_server_error_display() {
        let err = ServerError::Bind {
            listener: Listener::Grpc,
            address: "0.0.0.0:9090".to_string(),
            message: "address in use".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "gRPC listener failed to bind 0.0.0.0:9090: address in use"
        );

        let err = ServerError::ShutdownTimeout(Duration::from_secs(10));
        assert_eq!(
            err.to_string(),
            "Graceful shutdown did not complete within 10s"
        );

        let err = ServerError::Serve {
            listener: Listener::Http,
            message: "reset".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP server error: reset");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "HTTP_ADDRESS".to_string(),
            message: "empty".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for 'HTTP_ADDRESS': empty");

        let err = ConfigError::KeyFile {
            path: "/keys/jwt.pem".to_string(),
            message: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to load key file '/keys/jwt.pem': not found"
        );
    }

    #[test]
    fn test_app_error_transparent_wrapping() {
        let app_err: AppError = ServerError::AlreadyRunning.into();
        assert_eq!(app_err.to_string(), "Server is already running");

        let app_err: AppError = DatabaseError::TenantContext("x".to_string()).into();
        assert!(matches!(
            app_err,
            AppError::Database(DatabaseError::TenantContext(_))
        ));
    }
}
