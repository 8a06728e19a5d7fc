//! gRPC transport over a tonic channel.

use async_trait::async_trait;
use pep_sdk::PdpClientError;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use super::proto::{AuthorizationCheckRequest, AuthorizationCheckResponse, V1pdpServiceClient};
use super::transport::PdpTransport;
use crate::config::PdpClientConfig;

/// [`PdpTransport`] backed by one long-lived, multiplexed channel.
///
/// Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct GrpcPdpTransport {
    client: V1pdpServiceClient<Channel>,
}

impl GrpcPdpTransport {
    /// Create the channel without connecting; the first call connects.
    ///
    /// Must run inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`PdpClientError::Configuration`] if the endpoint URI or TLS setup is
    /// invalid.
    pub fn connect_lazy(config: &PdpClientConfig) -> Result<Self, PdpClientError> {
        let uri = config.endpoint_uri();
        let mut endpoint = Endpoint::from_shared(uri.clone()).map_err(|e| {
            PdpClientError::configuration(format!("invalid PDP endpoint '{uri}': {e}"))
        })?;

        if !config.use_plaintext {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|e| {
                    PdpClientError::configuration(format!("invalid TLS configuration: {e}"))
                })?;
        }

        Ok(Self {
            client: V1pdpServiceClient::new(endpoint.connect_lazy()),
        })
    }
}

#[async_trait]
impl PdpTransport for GrpcPdpTransport {
    async fn authorization_check(
        &self,
        request: AuthorizationCheckRequest,
    ) -> Result<AuthorizationCheckResponse, tonic::Status> {
        let mut client = self.client.clone();
        client
            .authorization_check(request)
            .await
            .map(tonic::Response::into_inner)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lazy_channel_does_not_need_a_live_server() {
        let config = PdpClientConfig::default();
        assert!(GrpcPdpTransport::connect_lazy(&config).is_ok());
    }

    #[tokio::test]
    async fn malformed_host_is_a_configuration_error() {
        let config = PdpClientConfig {
            host: "bad host with spaces".to_owned(),
            ..PdpClientConfig::default()
        };

        let err = GrpcPdpTransport::connect_lazy(&config).unwrap_err();
        assert!(matches!(err, PdpClientError::Configuration { .. }));
    }

    #[tokio::test]
    async fn unreachable_pdp_surfaces_a_status() {
        // Port 1 on loopback refuses connections.
        let config = PdpClientConfig {
            host: "127.0.0.1".to_owned(),
            port: 1,
            ..PdpClientConfig::default()
        };
        let transport = GrpcPdpTransport::connect_lazy(&config).unwrap();

        let status = transport
            .authorization_check(AuthorizationCheckRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            status.code(),
            tonic::Code::Unavailable | tonic::Code::Unknown
        ));
    }
}
