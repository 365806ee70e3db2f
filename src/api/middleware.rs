//! HTTP middleware for API layer.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, Response, header},
    middleware::Next,
    response::IntoResponse,
};
use tracing::warn;

use crate::app::AppState;
use crate::domain::{AppError, Claims, TenantId};

/// Identity of the caller, attached to the request by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    claims: Claims,
}

impl AuthContext {
    #[must_use]
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.claims.tenant_id
    }

    /// Tenant to pass to [`crate::infra::Database::run_tenant_scoped`].
    ///
    /// Tokens without a tenant claim may still call tenant-agnostic routes
    /// but are refused here.
    pub fn require_tenant(&self) -> Result<TenantId, AppError> {
        self.claims
            .tenant_id
            .ok_or_else(|| AppError::Authorization("token carries no tenant".to_string()))
    }

    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

fn bearer_token<B>(request: &Request<B>) -> Option<&str> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Bearer token authentication middleware.
///
/// Valid tokens attach an [`AuthContext`] extension; anything else is
/// answered with `401 {"error":"unauthorized"}` before reaching the handler.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let Some(token) = bearer_token(&request) else {
        warn!("Authentication failed: missing bearer token");
        return AppError::Authentication("missing bearer token".to_string()).into_response();
    };

    match state.token_validator.validate(token).await {
        Ok(claims) => {
            request.extensions_mut().insert(AuthContext::new(claims));
            next.run(request).await
        }
        Err(e) => {
            warn!(error = %e, "Authentication failed");
            e.into_response()
        }
    }
}
