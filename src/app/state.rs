//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::domain::TokenValidator;
use crate::infra::Database;
use crate::infra::observability::PrometheusHandle;

use super::config::Environment;

/// Shared application state for the Axum web server.
///
/// Handlers reach the database through [`Database::run_plain`] and
/// [`Database::run_tenant_scoped`]; the validator backs the `/v1`
/// authentication middleware.
#[derive(Clone)]
pub struct AppState {
    /// Transaction boundary manager over the shared pool.
    pub db: Database,

    /// Verifies bearer tokens on authenticated routes.
    pub token_validator: Arc<dyn TokenValidator>,

    pub environment: Environment,

    /// Present when the process-wide Prometheus recorder is installed.
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    #[must_use]
    pub fn new(
        db: Database,
        token_validator: Arc<dyn TokenValidator>,
        environment: Environment,
    ) -> Self {
        Self {
            db,
            token_validator,
            environment,
            metrics: None,
        }
    }

    /// Expose `GET /metrics` backed by `handle`.
    #[must_use]
    pub fn with_metrics(mut self, handle: Option<Arc<PrometheusHandle>>) -> Self {
        self.metrics = handle;
        self
    }
}
