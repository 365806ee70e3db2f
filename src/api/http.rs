//! Request/response listener.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::{Listener, ServerError};

/// HTTP listener serving an axum [`Router`] until asked to stop.
///
/// Stopping closes the accept loop and lets in-flight requests finish.
#[derive(Clone)]
pub struct HttpServer {
    address: String,
    router: Router,
    stop: CancellationToken,
}

impl HttpServer {
    pub fn new(address: impl Into<String>, router: Router) -> Self {
        Self {
            address: address.into(),
            router,
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
                listener: Listener::Http,
                address: self.address.clone(),
                message: e.to_string(),
            })
    }

    /// Serve connections from `listener` until [`HttpServer::stop`] is called
    /// and every in-flight request has completed.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr().ok();
        info!(address = ?local_addr, "HTTP server listening");

        axum::serve(
            listener,
            self.router
                .clone()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(self.stop.clone().cancelled_owned())
        .await
        .map_err(|e| ServerError::Serve {
            listener: Listener::Http,
            message: e.to_string(),
        })?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Stop accepting new connections.
    pub fn stop(&self) {
        self.stop.cancel();
    }
}
