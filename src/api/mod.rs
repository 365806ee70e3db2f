//! The API layer: HTTP routing and handlers, and the two network listeners.

pub mod grpc;
pub mod handlers;
pub mod http;
pub mod middleware;
pub mod router;

pub use grpc::GrpcServer;
pub use http::HttpServer;
pub use middleware::{AuthContext, auth_middleware};
pub use router::create_router;
