use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a tenant whose rows are isolated by row-level security.
///
/// Tenant identifiers are never ambient: every tenant-scoped database call
/// receives one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a random tenant identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for TenantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for TenantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Body of `GET /healthz`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

/// Error body returned by every failing HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Claims carried by an access token once the validator accepted it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
}

/// Body of `GET /v1/session`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionResponse {
    pub subject: String,
    pub tenant_id: Option<TenantId>,
}

/// Process-wide state of the lifecycle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Running,
    ShuttingDown,
    Stopped,
}

impl LifecycleState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Running => "running",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest applied schema migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationVersion {
    pub version: i64,
    /// The migration started but did not complete successfully.
    pub dirty: bool,
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dirty {
            write!(f, "{} (dirty)", self.version)
        } else {
            write!(f, "{}", self.version)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_parse_and_display() {
        let raw = "d707726c-7062-4164-bc6a-fc8134661490";
        let tenant: TenantId = raw.parse().unwrap();
        assert_eq!(tenant.to_string(), raw);
    }

    #[test]
    fn test_tenant_id_rejects_garbage() {
        assert!("not-a-tenant".parse::<TenantId>().is_err());
    }

    #[test]
    fn test_tenant_id_serde_is_plain_string() {
        let tenant: TenantId = "d707726c-7062-4164-bc6a-fc8134661490".parse().unwrap();
        let json = serde_json::to_string(&tenant).unwrap();
        assert_eq!(json, "\"d707726c-7062-4164-bc6a-fc8134661490\"");
        let back: TenantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tenant);
    }

    #[test]
    fn test_random_tenants_differ() {
        assert_ne!(TenantId::random(), TenantId::random());
    }

    #[test]
    fn test_health_response_body() {
        let json = serde_json::to_string(&HealthResponse::ok()).unwrap();
        assert_eq!(json, r#"{"status":"OK"}"#);
    }

    #[test]
    fn test_error_response_body() {
        let json = serde_json::to_string(&ErrorResponse::new("unauthorized")).unwrap();
        assert_eq!(json, r#"{"error":"unauthorized"}"#);
    }

    #[test]
    fn test_claims_without_tenant() {
        let claims: Claims = serde_json::from_str(r#"{"sub":"user-1","exp":10}"#).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.tenant_id.is_none());
    }

    #[test]
    fn test_migration_version_display() {
        let clean = MigrationVersion {
            version: 3,
            dirty: false,
        };
        assert_eq!(clean.to_string(), "3");

        let dirty = MigrationVersion {
            version: 4,
            dirty: true,
        };
        assert_eq!(dirty.to_string(), "4 (dirty)");
    }

    #[test]
    fn test_lifecycle_state_display() {
        assert_eq!(LifecycleState::ShuttingDown.to_string(), "shutting_down");
        assert_eq!(LifecycleState::Idle.as_str(), "idle");
    }
}
