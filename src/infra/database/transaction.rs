//! Transaction boundaries with optional tenant scoping.
//!
//! Both entry points run a caller-supplied unit of work on a single pooled
//! connection inside one transaction. The transaction is committed exactly
//! once when the callback succeeds and rolled back exactly once otherwise.
//!
//! Tenant-scoped transactions additionally set `app.current_tenant_id` with
//! `set_config(.., true)`, which is transaction-local: the setting disappears
//! at commit or rollback and never reaches the next user of the connection.
//! Row-level-security policies read this setting to filter every statement
//! the callback issues.
//!
//! ```ignore
//! let count = db
//!     .run_tenant_scoped(tenant_id, |conn| {
//!         Box::pin(async move {
//!             let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenant_records")
//!                 .fetch_one(&mut *conn)
//!                 .await?;
//!             Ok::<_, AppError>(count)
//!         })
//!     })
//!     .await?;
//! ```

use std::fmt::Display;

use futures::future::BoxFuture;
use sqlx::{PgConnection, Postgres, Transaction};
use tracing::{debug, error, instrument};

use crate::domain::{DatabaseError, TenantId};

use super::postgres::Database;

/// Session setting read by the row-level-security policies.
pub const TENANT_SETTING: &str = "app.current_tenant_id";

const SET_TENANT_SQL: &str = "SELECT set_config($1, $2, true)";

#[derive(Debug, Clone, Copy)]
enum Scope {
    Plain,
    Tenant,
}

impl Scope {
    fn as_str(self) -> &'static str {
        match self {
            Scope::Plain => "plain",
            Scope::Tenant => "tenant",
        }
    }
}

fn record(scope: Scope, outcome: &'static str) {
    metrics::counter!(
        "db_transactions_total",
        "mode" => scope.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

impl Database {
    /// Run `f` inside a transaction without tenant scoping.
    ///
    /// Errors returned by `f` are passed through unchanged after the
    /// transaction is rolled back. Failing to begin or commit yields
    /// [`DatabaseError::Transaction`].
    #[instrument(skip_all, fields(mode = "plain"))]
    pub async fn run_plain<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<DatabaseError> + Display + Send,
    {
        let tx = self.begin(Scope::Plain).await?;
        Self::complete(tx, Scope::Plain, f).await
    }

    /// Run `f` inside a transaction scoped to `tenant_id`.
    ///
    /// The tenant setting and every statement issued by `f` execute on the
    /// same transaction. Failing to set the tenant yields
    /// [`DatabaseError::TenantContext`] after rollback; otherwise the
    /// contract matches [`Database::run_plain`].
    #[instrument(skip_all, fields(mode = "tenant", tenant_id = %tenant_id))]
    pub async fn run_tenant_scoped<T, E, F>(&self, tenant_id: TenantId, f: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<DatabaseError> + Display + Send,
    {
        let mut tx = self.begin(Scope::Tenant).await?;

        let set = sqlx::query(SET_TENANT_SQL)
            .bind(TENANT_SETTING)
            .bind(tenant_id.to_string())
            .execute(&mut *tx)
            .await;
        if let Err(e) = set {
            error!(error = %e, "failed to set tenant context");
            record(Scope::Tenant, "tenant_context_error");
            Self::rollback(tx).await;
            return Err(DatabaseError::TenantContext(format!(
                "failed to set tenant context for {tenant_id}: {e}"
            ))
            .into());
        }

        Self::complete(tx, Scope::Tenant, f).await
    }

    async fn begin(&self, scope: Scope) -> Result<Transaction<'static, Postgres>, DatabaseError> {
        match self.pool.begin().await {
            Ok(tx) => {
                debug!("transaction started");
                Ok(tx)
            }
            Err(e) => {
                error!(error = %e, "failed to begin transaction");
                record(scope, "begin_error");
                Err(DatabaseError::Transaction(format!(
                    "failed to begin transaction: {e}"
                )))
            }
        }
    }

    async fn complete<T, E, F>(
        mut tx: Transaction<'static, Postgres>,
        scope: Scope,
        f: F,
    ) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<DatabaseError> + Display + Send,
    {
        let value = match f(&mut *tx).await {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "transaction callback failed, rolling back");
                record(scope, "rollback");
                Self::rollback(tx).await;
                return Err(e);
            }
        };

        if let Err(e) = tx.commit().await {
            error!(error = %e, "failed to commit transaction");
            record(scope, "commit_error");
            return Err(DatabaseError::Transaction(format!(
                "failed to commit transaction: {e}"
            ))
            .into());
        }

        debug!("transaction committed");
        record(scope, "commit");
        Ok(value)
    }

    /// Roll back, logging (never returning) a failure so the caller keeps
    /// the error that caused the rollback.
    async fn rollback(tx: Transaction<'static, Postgres>) {
        if let Err(e) = tx.rollback().await {
            error!(error = %e, "failed to rollback transaction");
        }
    }
}
