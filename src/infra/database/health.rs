//! Background liveness checks for the connection pool.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Periodically pings the pool so broken connections surface in the logs
/// before a request trips over them.
pub struct PoolHealthMonitor {
    pool: PgPool,
    period: Duration,
    shutdown: CancellationToken,
}

impl PoolHealthMonitor {
    pub fn new(pool: PgPool, period: Duration, shutdown: CancellationToken) -> Self {
        Self {
            pool,
            period,
            shutdown,
        }
    }

    /// Run the monitor loop until the token is cancelled or the pool closes.
    pub async fn run(self) {
        info!(period = ?self.period, "Starting pool health monitor");

        let mut ticker = tokio::time::interval(self.period);
        // The first tick completes immediately; the pool was just probed.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.pool.is_closed() {
                        break;
                    }
                    self.check().await;
                }
                () = self.shutdown.cancelled() => {
                    break;
                }
            }
        }

        info!("Pool health monitor stopped");
    }

    async fn check(&self) {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => debug!(
                size = self.pool.size(),
                idle = self.pool.num_idle(),
                "Pool health check passed"
            ),
            Err(e) => warn!(error = %e, "Pool health check failed"),
        }
    }

    /// Spawn the monitor as a tokio task
    pub fn spawn(
        pool: PgPool,
        period: Duration,
        shutdown: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(Self::new(pool, period, shutdown).run())
    }
}
