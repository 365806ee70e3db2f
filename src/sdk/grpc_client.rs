//! Client for the service's gRPC API.
//!
//! Only the standard health service exists today. Generated stubs for
//! business services share the same lazily connected [`Channel`].

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;
use tonic_health::pb::HealthCheckRequest;

use super::error::SdkError;

/// Configuration for the gRPC client
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// Deadline applied to every call.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GrpcClient {
    channel: Channel,
}

impl GrpcClient {
    /// Build a client without dialing; the connection is made on first use.
    ///
    /// `address` may omit the scheme (`127.0.0.1:9090`), in which case
    /// plaintext `http://` is assumed.
    pub fn connect_lazy(address: &str, config: GrpcClientConfig) -> Result<Self, SdkError> {
        let uri = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };
        let channel = Endpoint::from_shared(uri)
            .map_err(|e| SdkError::Configuration(e.to_string()))?
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .connect_lazy();
        Ok(Self { channel })
    }

    /// Channel for generated service stubs.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }

    /// Overall serving status reported by `grpc.health.v1.Health/Check`.
    pub async fn health(&self) -> Result<ServingStatus, SdkError> {
        let response = HealthClient::new(self.channel.clone())
            .check(HealthCheckRequest {
                service: String::new(),
            })
            .await?;
        let status = response.into_inner().status;
        ServingStatus::try_from(status)
            .map_err(|_| SdkError::Decode(format!("unknown serving status {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grpc_client_config_default() {
        let config = GrpcClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_connect_lazy_does_not_dial() {
        // Nothing listens on port 1; construction must still succeed.
        assert!(GrpcClient::connect_lazy("127.0.0.1:1", GrpcClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_address_rejected() {
        let err = GrpcClient::connect_lazy("http://bad host", GrpcClientConfig::default())
            .unwrap_err();
        assert!(matches!(err, SdkError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_rpc_error() {
        let config = GrpcClientConfig {
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
        };
        let client = GrpcClient::connect_lazy("127.0.0.1:1", config).unwrap();
        assert!(matches!(client.health().await, Err(SdkError::Rpc(_))));
    }
}
