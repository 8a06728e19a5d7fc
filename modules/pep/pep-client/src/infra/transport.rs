//! Transport seam between the client facade and the PDP.

use async_trait::async_trait;

use super::proto::{AuthorizationCheckRequest, AuthorizationCheckResponse};

/// Issues the unary `AuthorizationCheck` call.
///
/// [`super::GrpcPdpTransport`] talks to a real PDP; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait PdpTransport: Send + Sync {
    /// Send one request and wait for its response.
    async fn authorization_check(
        &self,
        request: AuthorizationCheckRequest,
    ) -> Result<AuthorizationCheckResponse, tonic::Status>;
}
