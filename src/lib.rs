//! Tenant Service Template
//!
//! A service template exposing an HTTP API and a gRPC API side by side,
//! backed by PostgreSQL with row-level security for tenant isolation.
//!
//! # Architecture Overview
//!
//! This crate is organized into four main layers plus a client SDK:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │   HTTP router, auth middleware, listeners    │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │    Configuration, state, lifecycle control   │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │       Traits, types, errors (no I/O)         │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  Pool, transactions, migrations, JWT, logs   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Tenant-scoped transactions**: [`infra::Database::run_tenant_scoped`]
//!   sets the tenant for one transaction only, so pooled connections never
//!   carry a tenant into the next checkout
//! - **Dual listeners**: HTTP and gRPC start together and stop together
//!   within a bounded grace period ([`app::Server`])
//! - **Testability**: the token validator sits behind a trait with a mock in
//!   [`test_utils`]
//! - **Logging**: Structured logging with `tracing`
//! - **Security**: Secret management with `secrecy` crate
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tenant_service_template::app::{AppConfig, Environment, Server};
//! use tenant_service_template::cli::shutdown_signal;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::new(
//!         database_url.into(),
//!         ":8080",
//!         ":9090",
//!         "keys/jwt.pem".into(),
//!         Environment::Development,
//!     )?;
//!
//!     let server = Arc::new(Server::new(&config).await?);
//!     server.run(shutdown_signal(), config.shutdown_grace_period).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod sdk;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
