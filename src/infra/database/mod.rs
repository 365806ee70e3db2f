//! PostgreSQL access: pool, transaction boundaries, migrations.

pub mod health;
pub mod migrations;
pub mod postgres;
pub mod transaction;

pub use health::PoolHealthMonitor;
pub use migrations::{migrate_down, migrate_up, migrate_version};
pub use postgres::{Database, PoolConfig};
pub use transaction::TENANT_SETTING;
