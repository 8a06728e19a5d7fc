//! Async client facade.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use pep_sdk::{AuthorizationClient, AuthorizationRequest, AuthorizationResponse, PdpClientError};
use tracing::{debug, info};

use crate::config::PdpClientConfig;
use crate::domain::{RequestDefaults, validate_and_default};
use crate::infra::{GrpcPdpTransport, PdpTransport};
use crate::mapping::{map_from_wire_response, map_to_wire_request};

/// Lifecycle state of a [`PdpClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Channel created; calls are accepted.
    Ready,
    /// Channel released; calls fail with [`PdpClientError::ClientClosed`].
    Shutdown,
}

/// Client for a Permguard PDP.
///
/// Holds one long-lived channel for its whole lifetime. Safe to share
/// (`Arc<PdpClient>`) across concurrent tasks; each call is independent.
///
/// ```ignore
/// let client = PdpClient::new(&PdpClientConfig::default()
///     .with_default_zone_id(611_159_836_099)
///     .with_default_policy_store(PolicyStore::ledger("f96586c317c74aaaae4ff2ba2fef0459")))?;
///
/// let response = client.check_authorization(request).await?;
/// client.shutdown();
/// ```
pub struct PdpClient {
    transport: RwLock<Option<Arc<dyn PdpTransport>>>,
    defaults: RequestDefaults,
}

impl PdpClient {
    /// Create a client with a lazily connecting gRPC channel.
    ///
    /// # Errors
    ///
    /// [`PdpClientError::Configuration`] if called outside a Tokio runtime or
    /// if the endpoint is invalid.
    pub fn new(config: &PdpClientConfig) -> Result<Self, PdpClientError> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(PdpClientError::configuration(
                "PdpClient must be created inside a Tokio runtime; use BlockingPdpClient otherwise",
            ));
        }

        let transport = GrpcPdpTransport::connect_lazy(config)?;
        info!(
            endpoint = %config.endpoint_uri(),
            default_zone_id = config.default_zone_id,
            "PDP client ready"
        );
        Ok(Self::with_transport(
            Arc::new(transport),
            config.request_defaults(),
        ))
    }

    /// Create a client over any transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn PdpTransport>, defaults: RequestDefaults) -> Self {
        Self {
            transport: RwLock::new(Some(transport)),
            defaults,
        }
    }

    #[must_use]
    pub fn state(&self) -> ClientState {
        if self.transport.read().is_some() {
            ClientState::Ready
        } else {
            ClientState::Shutdown
        }
    }

    #[must_use]
    pub fn defaults(&self) -> &RequestDefaults {
        &self.defaults
    }

    /// Release the channel. Idempotent; in-flight calls complete.
    pub fn shutdown(&self) {
        if self.transport.write().take().is_some() {
            info!("PDP client shut down");
        }
    }

    /// Validate, map, send and map back one authorization request.
    ///
    /// A denial is a successful call with `decision == false`.
    ///
    /// # Errors
    ///
    /// - [`PdpClientError::ClientClosed`] after [`PdpClient::shutdown`]
    /// - [`PdpClientError::MissingRequiredField`] / [`PdpClientError::InvalidRequest`]
    ///   from validation, before any RPC
    /// - [`PdpClientError::UnsupportedValueType`] from mapping, before any RPC
    /// - [`PdpClientError::Transport`] if the RPC fails
    #[tracing::instrument(
        skip_all,
        fields(
            zone_id = request.zone_id,
            mode = request.mode().as_str(),
            evaluations = request.evaluations.len()
        )
    )]
    pub async fn check_authorization(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationResponse, PdpClientError> {
        let transport = self
            .transport
            .read()
            .clone()
            .ok_or(PdpClientError::ClientClosed)
            .map_err(|e| log_failure("check", e))?;

        let request = validate_and_default(request, &self.defaults)
            .map_err(|e| log_failure("validate", e))?;

        debug!("mapping authorization check request");
        let wire_request = map_to_wire_request(&request).map_err(|e| log_failure("map", e))?;

        debug!("sending authorization check request");
        let wire_response = transport
            .authorization_check(wire_request)
            .await
            .map_err(|status| log_failure("invoke", PdpClientError::transport(status)))?;

        debug!(
            decision = wire_response.decision,
            "mapping authorization check response"
        );
        Ok(map_from_wire_response(wire_response))
    }
}

fn log_failure(step: &str, e: PdpClientError) -> PdpClientError {
    tracing::error!(step, error = %e, "authorization check failed");
    e
}

#[async_trait]
impl AuthorizationClient for PdpClient {
    async fn check_authorization(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationResponse, PdpClientError> {
        PdpClient::check_authorization(self, request).await
    }
}

impl std::fmt::Debug for PdpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdpClient")
            .field("state", &self.state())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_outside_runtime_is_a_configuration_error() {
        let err = PdpClient::new(&PdpClientConfig::default()).unwrap_err();
        assert!(matches!(err, PdpClientError::Configuration { .. }));
    }

    #[tokio::test]
    async fn new_inside_runtime_is_ready() {
        let client = PdpClient::new(&PdpClientConfig::default().with_default_zone_id(42)).unwrap();

        assert_eq!(client.state(), ClientState::Ready);
        assert_eq!(client.defaults().zone_id, 42);
        assert!(format!("{client:?}").contains("Ready"));
    }
}
