//! Blocking client facade.
//!
//! Wraps [`PdpClient`] with a private Tokio runtime so callers without an
//! async context block the calling thread until the PDP answers.

use std::sync::Arc;

use pep_sdk::{AuthorizationRequest, AuthorizationResponse, PdpClientError};
use tokio::runtime::{Builder, Handle, Runtime};

use crate::client::{ClientState, PdpClient};
use crate::config::PdpClientConfig;
use crate::domain::RequestDefaults;
use crate::infra::PdpTransport;

/// Synchronous [`PdpClient`].
///
/// Refuses to be created or called from inside another Tokio runtime. Use
/// [`PdpClient`] there.
pub struct BlockingPdpClient {
    inner: PdpClient,
    runtime: Runtime,
}

impl BlockingPdpClient {
    /// # Errors
    ///
    /// - [`PdpClientError::Unexpected`] if the runtime cannot start
    /// - [`PdpClientError::Configuration`] if called inside a Tokio runtime or
    ///   if the endpoint is invalid
    pub fn new(config: &PdpClientConfig) -> Result<Self, PdpClientError> {
        let runtime = build_runtime()?;
        let inner = {
            let _guard = runtime.enter();
            PdpClient::new(config)?
        };
        Ok(Self { inner, runtime })
    }

    /// # Errors
    ///
    /// - [`PdpClientError::Unexpected`] if the runtime cannot start
    /// - [`PdpClientError::Configuration`] if called inside a Tokio runtime
    pub fn with_transport(
        transport: Arc<dyn PdpTransport>,
        defaults: RequestDefaults,
    ) -> Result<Self, PdpClientError> {
        Ok(Self {
            inner: PdpClient::with_transport(transport, defaults),
            runtime: build_runtime()?,
        })
    }

    /// See [`PdpClient::check_authorization`].
    ///
    /// # Errors
    ///
    /// Same as [`PdpClient::check_authorization`], plus
    /// [`PdpClientError::Configuration`] when called inside a Tokio runtime.
    pub fn check_authorization(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationResponse, PdpClientError> {
        ensure_outside_runtime()?;
        self.runtime
            .block_on(self.inner.check_authorization(request))
    }

    pub fn shutdown(&self) {
        self.inner.shutdown();
    }

    #[must_use]
    pub fn state(&self) -> ClientState {
        self.inner.state()
    }
}

fn ensure_outside_runtime() -> Result<(), PdpClientError> {
    if Handle::try_current().is_ok() {
        return Err(PdpClientError::configuration(
            "BlockingPdpClient cannot be used inside a Tokio runtime; use PdpClient instead",
        ));
    }
    Ok(())
}

fn build_runtime() -> Result<Runtime, PdpClientError> {
    ensure_outside_runtime()?;
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("pdp-client")
        .enable_all()
        .build()
        .map_err(|e| PdpClientError::unexpected_with("failed to start PDP client runtime", e))
}

impl std::fmt::Debug for BlockingPdpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingPdpClient")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use pep_sdk::Principal;

    use super::*;

    #[test]
    fn new_outside_runtime_succeeds() {
        let client = BlockingPdpClient::new(&PdpClientConfig::default()).unwrap();
        assert_eq!(client.state(), ClientState::Ready);

        client.shutdown();
        client.shutdown();
        assert_eq!(client.state(), ClientState::Shutdown);
    }

    #[tokio::test]
    async fn new_inside_runtime_is_refused() {
        let err = BlockingPdpClient::new(&PdpClientConfig::default()).unwrap_err();
        assert!(matches!(err, PdpClientError::Configuration { .. }));
        assert!(err.to_string().contains("use PdpClient instead"));
    }

    #[test]
    fn call_from_inside_a_runtime_is_refused() {
        let client = BlockingPdpClient::new(&PdpClientConfig::default()).unwrap();
        let outer = Builder::new_current_thread().build().unwrap();

        let err = outer
            .block_on(async { client.check_authorization(AuthorizationRequest::new(Principal::user("amy"))) })
            .unwrap_err();
        assert!(matches!(err, PdpClientError::Configuration { .. }));
    }
}
