use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the SDK clients.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Invalid client configuration: {0}")]
    Configuration(String),
    #[error("Request failed: {0}")]
    Request(String),
    /// Error status with a body that is not the service's JSON error shape.
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },
    /// Error status with a `{"error": ...}` body.
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("RPC failed: {0}")]
    Rpc(#[from] tonic::Status),
}
