//! Infrastructure layer implementations.

pub mod auth;
pub mod database;
pub mod observability;

pub use auth::JwtValidator;
pub use database::{Database, PoolConfig};
