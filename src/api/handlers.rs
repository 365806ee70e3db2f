//! HTTP request handlers and error responses.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::{error, warn};

use crate::app::AppState;
use crate::domain::{
    AppError, DatabaseError, ErrorResponse, HealthResponse, ServerError, SessionResponse,
};

use super::middleware::AuthContext;

/// Liveness probe. Unauthenticated and independent of the database.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Prometheus scrape output. Routed only when a recorder is installed.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

/// Identity of the authenticated caller.
pub async fn session_handler(Extension(auth): Extension<AuthContext>) -> Json<SessionResponse> {
    Json(SessionResponse {
        subject: auth.subject().to_string(),
        tenant_id: auth.tenant_id(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("not found")))
}

impl AppError {
    /// Status code and the generic message safe to send to clients.
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Database(db_err) => match db_err {
                DatabaseError::Connection(_) | DatabaseError::PoolExhausted(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "service unavailable")
                }
                DatabaseError::NotFound(_) => (StatusCode::NOT_FOUND, "not found"),
                DatabaseError::Duplicate(_) => (StatusCode::CONFLICT, "conflict"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
            },
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
            AppError::Server(ServerError::ShutdownTimeout(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service unavailable")
            }
            AppError::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal server error"),
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::Serialization(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Claims, TenantId};
    use http_body_util::BodyExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_handler() {
        let Json(body) = health_handler().await;
        assert_eq!(body.status, "OK");
    }

    #[tokio::test]
    async fn test_session_handler_echoes_claims() {
        let tenant = TenantId::random();
        let auth = AuthContext::new(Claims {
            sub: "user-42".to_string(),
            exp: 0,
            tenant_id: Some(tenant),
        });
        let Json(body) = session_handler(Extension(auth)).await;
        assert_eq!(body.subject, "user-42");
        assert_eq!(body.tenant_id, Some(tenant));
    }

    #[tokio::test]
    async fn test_authentication_error_is_generic() {
        let response = AppError::Authentication("token expired".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "unauthorized" })
        );
    }

    #[tokio::test]
    async fn test_database_error_does_not_leak_details() {
        let response = AppError::Database(DatabaseError::Query(
            "relation \"secret_table\" does not exist".to_string(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal server error");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::Database(DatabaseError::Connection("refused".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Database(DatabaseError::PoolExhausted("timeout".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Database(DatabaseError::NotFound("row".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Database(DatabaseError::Duplicate("key".into())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Database(DatabaseError::TenantContext("set_config".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Authorization("no tenant".into()), StatusCode::FORBIDDEN),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_message().0, expected, "{err}");
        }
    }
}
