//! Embedded schema migrations (`migrations/`).

use sqlx::migrate::Migrator;
use sqlx::{PgPool, Row};
use tracing::{info, instrument};

use crate::domain::{DatabaseError, MigrationVersion};

use super::postgres::{Database, PoolConfig};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Migrations need a single connection and no idle floor.
fn migration_pool_config() -> PoolConfig {
    PoolConfig {
        max_connections: 1,
        min_connections: 0,
        ..PoolConfig::default()
    }
}

async fn with_migration_pool<T, Fut>(
    database_url: &str,
    op: impl FnOnce(PgPool) -> Fut,
) -> Result<T, DatabaseError>
where
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let db = Database::connect(database_url, migration_pool_config()).await?;
    let result = op(db.pool().clone()).await;
    db.close().await;
    result
}

/// Apply all pending migrations.
#[instrument(skip_all)]
pub async fn migrate_up(database_url: &str) -> Result<(), DatabaseError> {
    with_migration_pool(database_url, |pool| async move {
        info!("Running database migrations...");
        MIGRATOR.run(&pool).await?;
        info!("Database migrations completed successfully");
        Ok(())
    })
    .await
}

/// Revert the most recently applied migration.
#[instrument(skip_all)]
pub async fn migrate_down(database_url: &str) -> Result<(), DatabaseError> {
    with_migration_pool(database_url, |pool| async move {
        let applied = applied_versions(&pool, 2).await?;
        let Some(latest) = applied.first().copied() else {
            info!("No migrations to roll back");
            return Ok(());
        };
        let target = applied.get(1).copied().unwrap_or(0);

        info!(version = latest, target, "Rolling back migration");
        MIGRATOR.undo(&pool, target).await?;
        info!(version = latest, "Migration rolled back");
        Ok(())
    })
    .await
}

/// Latest applied migration, or `None` on a fresh database.
#[instrument(skip_all)]
pub async fn migrate_version(database_url: &str) -> Result<Option<MigrationVersion>, DatabaseError> {
    with_migration_pool(database_url, |pool| async move {
        if !migrations_table_exists(&pool).await? {
            return Ok(None);
        }
        let row = sqlx::query(
            "SELECT version, success FROM _sqlx_migrations ORDER BY version DESC LIMIT 1",
        )
        .fetch_optional(&pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(row.map(|row| MigrationVersion {
            version: row.get("version"),
            dirty: !row.get::<bool, _>("success"),
        }))
    })
    .await
}

async fn migrations_table_exists(pool: &PgPool) -> Result<bool, DatabaseError> {
    sqlx::query_scalar::<_, bool>("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::from)
}

async fn applied_versions(pool: &PgPool, limit: i64) -> Result<Vec<i64>, DatabaseError> {
    if !migrations_table_exists(pool).await? {
        return Ok(Vec::new());
    }
    sqlx::query_scalar::<_, i64>(
        "SELECT version FROM _sqlx_migrations WHERE success ORDER BY version DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_are_reversible() {
        assert!(MIGRATOR.iter().next().is_some());
        assert!(
            MIGRATOR
                .iter()
                .all(|m| m.migration_type.is_reversible()),
            "every migration needs a .down.sql counterpart"
        );
    }

    #[tokio::test]
    async fn test_migrate_up_with_malformed_url() {
        let err = migrate_up("::not a url::").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Configuration(_)));
    }
}
