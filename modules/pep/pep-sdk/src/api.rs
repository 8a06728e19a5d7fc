//! Public API trait for the PEP client.

use async_trait::async_trait;

use crate::error::PdpClientError;
use crate::models::{AuthorizationRequest, AuthorizationResponse};

/// Public API trait for talking to a Policy Decision Point.
///
/// Implemented by the gRPC client in `permguard-pep-client`; consumers hold
/// it as `Arc<dyn AuthorizationClient>` so tests can substitute a mock:
///
/// ```ignore
/// let client: Arc<dyn AuthorizationClient> = Arc::new(PdpClient::new(config)?);
///
/// let response = client.check_authorization(request).await?;
/// if !response.decision {
///     println!("denied: {}", response.context.reason_user.message);
/// }
/// ```
#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    /// Check an authorization request against the PDP.
    ///
    /// Returns the decision (permit/deny) with reasons and per-evaluation
    /// results.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredField` / `InvalidRequest` if the request is invalid
    ///   after applying client defaults
    /// - `UnsupportedValueType` if a payload value cannot be sent
    /// - `Transport` if the RPC fails
    /// - `ClientClosed` if the client has been shut down
    async fn check_authorization(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationResponse, PdpClientError>;
}
