//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and slow collaborators.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header};

use crate::domain::{AppError, Claims, TenantId, TokenValidator};

const FIXTURE_PRIVATE_KEY: &[u8] = include_bytes!("../../tests/fixtures/jwt_ed25519_private.pem");
const OTHER_PRIVATE_KEY: &[u8] = include_bytes!("../../tests/fixtures/other_ed25519_private.pem");

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

/// Mock token validator for testing.
///
/// Accepts only the tokens registered with [`MockTokenValidator::with_token`].
/// Clones share the registered tokens and the call counter.
///
/// # Example
///
/// ```ignore
/// use tenant_service_template::domain::Claims;
/// use tenant_service_template::test_utils::{MockTokenValidator, mocks::MockConfig};
///
/// let validator = MockTokenValidator::new().with_token(
///     "token",
///     Claims { sub: "user".to_string(), exp: u64::MAX, tenant_id: None },
/// );
///
/// let failing = MockTokenValidator::with_config(MockConfig::failure("key rotated"));
/// ```
#[derive(Clone)]
pub struct MockTokenValidator {
    tokens: Arc<Mutex<HashMap<String, Claims>>>,
    config: MockConfig,
    call_count: Arc<AtomicU64>,
}

impl MockTokenValidator {
    /// Creates a validator that knows no tokens.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(HashMap::new())),
            config,
            call_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registers `token` as valid for `claims`.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>, claims: Claims) -> Self {
        self.tokens.lock().unwrap().insert(token.into(), claims);
        self
    }

    /// Gets the number of times `validate` was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Default for MockTokenValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenValidator for MockTokenValidator {
    async fn validate(&self, token: &str) -> Result<Claims, AppError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(ms) = self.config.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock validator error".to_string());
            return Err(AppError::Authentication(msg));
        }

        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Authentication("unknown token".to_string()))
    }
}

/// Path of the Ed25519 public key matching [`sign_token`].
#[must_use]
pub fn fixture_public_key_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/jwt_ed25519_public.pem")
}

/// Claims for `sub` valid for the next hour.
#[must_use]
pub fn claims_for(sub: &str, tenant_id: Option<TenantId>) -> Claims {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    Claims {
        sub: sub.to_string(),
        exp: now + 3600,
        tenant_id,
    }
}

/// Signs `claims` with the fixture key accepted by [`fixture_public_key_path`].
pub fn sign_token(claims: &Claims) -> String {
    sign_with(FIXTURE_PRIVATE_KEY, claims)
}

/// Signs `claims` with a key the fixture public key does not match.
pub fn sign_token_with_foreign_key(claims: &Claims) -> String {
    sign_with(OTHER_PRIVATE_KEY, claims)
}

fn sign_with(pem: &[u8], claims: &Claims) -> String {
    let key = EncodingKey::from_ed_pem(pem).unwrap();
    jsonwebtoken::encode(&Header::new(Algorithm::EdDSA), claims, &key).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> Claims {
        claims_for("user-1", Some(TenantId::random()))
    }

    #[tokio::test]
    async fn test_registered_token_is_accepted() {
        let expected = claims();
        let mock = MockTokenValidator::new().with_token("t", expected.clone());
        assert_eq!(mock.validate("t").await.unwrap(), expected);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let mock = MockTokenValidator::new();
        assert!(matches!(
            mock.validate("nope").await,
            Err(AppError::Authentication(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_validator() {
        let mock = MockTokenValidator::with_config(MockConfig::failure("down"))
            .with_token("t", claims());
        match mock.validate("t").await {
            Err(AppError::Authentication(msg)) => assert_eq!(msg, "down"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clones_share_call_count() {
        let mock = MockTokenValidator::new();
        let clone = mock.clone();
        let _ = clone.validate("x").await;
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_sign_token_produces_jwt() {
        let token = sign_token(&claims());
        assert_eq!(token.split('.').count(), 3);
    }
}
