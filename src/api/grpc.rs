//! RPC listener.
//!
//! No business services are registered yet; the server carries the standard
//! `grpc.health.v1` service and reflection so tooling such as `grpcurl` and
//! load-balancer probes work from day one. Register your services in
//! [`GrpcServer::serve`] next to the health service.

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tonic_health::ServingStatus;
use tracing::info;

use crate::domain::{Listener, ServerError};

#[derive(Clone)]
pub struct GrpcServer {
    address: String,
    stop: CancellationToken,
}

impl GrpcServer {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            stop: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        TcpListener::bind(&self.address)
            .await
            .map_err(|e| ServerError::Bind {
                listener: Listener::Grpc,
                address: self.address.clone(),
                message: e.to_string(),
            })
    }

    /// Serve RPCs until [`GrpcServer::stop`] is called and in-flight calls
    /// have completed.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let serve_error = |message: String| ServerError::Serve {
            listener: Listener::Grpc,
            message,
        };

        let (health_reporter, health_service) = tonic_health::server::health_reporter();
        health_reporter
            .set_service_status("", ServingStatus::Serving)
            .await;

        let reflection = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(tonic_health::pb::FILE_DESCRIPTOR_SET)
            .build_v1()
            .map_err(|e| serve_error(e.to_string()))?;

        let stop = self.stop.clone();
        let shutdown = async move {
            stop.cancelled().await;
            health_reporter
                .set_service_status("", ServingStatus::NotServing)
                .await;
            info!("gRPC server draining");
        };

        info!(address = ?listener.local_addr().ok(), "gRPC server listening");
        Server::builder()
            .add_service(health_service)
            .add_service(reflection)
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
            .await
            .map_err(|e| serve_error(e.to_string()))?;

        info!("gRPC server stopped");
        Ok(())
    }

    pub fn stop(&self) {
        self.stop.cancel();
    }
}
