//! PostgreSQL connection pool.

use std::str::FromStr;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::domain::DatabaseError;

use super::health::PoolHealthMonitor;

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
    pub health_check_period: Duration,
    pub acquire_timeout: Duration,
    /// Upper bound for the liveness probe run by [`Database::connect`].
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 25,
            min_connections: 5,
            max_lifetime: Duration::from_secs(60 * 60),
            idle_timeout: Duration::from_secs(30 * 60),
            health_check_period: Duration::from_secs(60),
            acquire_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Shared handle to the connection pool.
///
/// Cloning is cheap; every clone refers to the same pool.
#[derive(Clone, Debug)]
pub struct Database {
    pub(super) pool: PgPool,
    monitor: CancellationToken,
}

impl Database {
    /// Build the pool and verify the database is reachable.
    ///
    /// Fails with [`DatabaseError::Configuration`] when the URL cannot be
    /// parsed and with [`DatabaseError::Connection`] when the liveness probe
    /// does not succeed within `config.connect_timeout`. The pool is closed
    /// before a connectivity error is returned.
    pub async fn connect(database_url: &str, config: PoolConfig) -> Result<Self, DatabaseError> {
        info!("Connecting to PostgreSQL...");
        let db = Self::connect_lazy(database_url, &config)?;

        let probe = tokio::time::timeout(config.connect_timeout, db.health_check()).await;
        let failure = match probe {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some(format!(
                "liveness probe timed out after {:?}",
                config.connect_timeout
            )),
        };
        if let Some(message) = failure {
            warn!(error = %message, "PostgreSQL liveness probe failed");
            db.close().await;
            return Err(DatabaseError::Connection(message));
        }

        PoolHealthMonitor::spawn(
            db.pool.clone(),
            config.health_check_period,
            db.monitor.clone(),
        );
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connected to PostgreSQL"
        );
        Ok(db)
    }

    /// Build the pool without opening any connection.
    ///
    /// Connections are established on first use. Only URL parsing can fail.
    pub fn connect_lazy(database_url: &str, config: &PoolConfig) -> Result<Self, DatabaseError> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| DatabaseError::Configuration(format!("invalid database URL: {e}")))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(config.max_lifetime)
            .idle_timeout(config.idle_timeout)
            .acquire_timeout(config.acquire_timeout)
            .test_before_acquire(true)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            monitor: CancellationToken::new(),
        })
    }

    /// Check database connectivity
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.monitor.cancel();
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
