//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::Claims;

/// Verifies bearer tokens presented to authenticated routes.
///
/// The verification algorithm belongs to the implementation; callers only
/// learn whether the token was accepted and, if so, which claims it carries.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate a raw token (without the `Bearer ` prefix).
    async fn validate(&self, token: &str) -> Result<Claims, AppError>;
}
