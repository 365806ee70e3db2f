//! Client SDK for the service's HTTP and gRPC APIs.

pub mod error;
pub mod grpc_client;
pub mod http_client;
pub mod logger;

pub use error::SdkError;
pub use grpc_client::{GrpcClient, GrpcClientConfig};
pub use http_client::{HttpClient, HttpClientConfig};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use tonic_health::pb::health_check_response::ServingStatus;
