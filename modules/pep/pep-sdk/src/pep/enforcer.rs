//! Policy Enforcement Point (`PEP`) object.
//!
//! [`PolicyEnforcer`] turns a PDP decision into control flow:
//! call PDP → fail with [`EnforcerError::Denied`] unless permitted.
//!
//! Constructed once during service initialisation with the client and
//! shared by every call site.

use std::sync::Arc;

use crate::api::AuthorizationClient;
use crate::error::PdpClientError;
use crate::models::{AuthorizationRequest, AuthorizationResponse, ContextDetail, RequestMode};

/// Error from the PEP enforcement flow.
#[derive(Debug, thiserror::Error)]
pub enum EnforcerError {
    /// The PDP denied the request.
    #[error("access denied by PDP")]
    Denied {
        /// Decision context with admin and user reasons.
        context: ContextDetail,
    },

    /// One evaluation of a batch was denied.
    #[error("evaluation '{request_id}' (#{index}) denied by PDP")]
    EvaluationDenied {
        index: usize,
        request_id: String,
        context: ContextDetail,
    },

    /// The PDP answered a batch with a different number of results.
    #[error("PDP returned {actual} evaluation results for {expected} evaluations")]
    ResultCountMismatch { expected: usize, actual: usize },

    /// The authorization check itself failed.
    #[error("authorization check failed: {0}")]
    CheckFailed(#[from] PdpClientError),
}

/// Policy Enforcement Point.
///
/// Cloneable and cheap to pass around (`Arc` inside).
///
/// # Example
///
/// ```ignore
/// use pep_sdk::pep::PolicyEnforcer;
///
/// let enforcer = PolicyEnforcer::new(client.clone());
///
/// // Err(EnforcerError::Denied { .. }) unless the PDP permits
/// enforcer.enforce(request).await?;
/// ```
#[derive(Clone)]
pub struct PolicyEnforcer {
    client: Arc<dyn AuthorizationClient>,
}

impl PolicyEnforcer {
    /// Create a new enforcer.
    #[must_use]
    pub fn new(client: Arc<dyn AuthorizationClient>) -> Self {
        Self { client }
    }

    /// Run the check and return the raw response, permitted or not.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::CheckFailed`] if the PDP call fails
    pub async fn check(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationResponse, EnforcerError> {
        Ok(self.client.check_authorization(request).await?)
    }

    /// Run the check and require an overall permit.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::CheckFailed`] if the PDP call fails
    /// - [`EnforcerError::Denied`] if the overall decision is deny
    pub async fn enforce(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationResponse, EnforcerError> {
        let response = self.check(request).await?;

        if !response.decision {
            tracing::debug!(
                reason_code = %response.context.reason_admin.code,
                "access denied by PDP"
            );
            return Err(EnforcerError::Denied {
                context: response.context,
            });
        }

        Ok(response)
    }

    /// Run a check and require every evaluation to be permitted.
    ///
    /// Atomic requests behave like [`PolicyEnforcer::enforce`]. For batch
    /// requests the first denied evaluation (in submission order) is
    /// reported.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::CheckFailed`] if the PDP call fails
    /// - [`EnforcerError::ResultCountMismatch`] if results do not line up
    ///   with the submitted evaluations
    /// - [`EnforcerError::EvaluationDenied`] for the first denied evaluation
    /// - [`EnforcerError::Denied`] if the overall decision is deny
    pub async fn enforce_all(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationResponse, EnforcerError> {
        if request.mode() == RequestMode::Atomic {
            return self.enforce(request).await;
        }

        let submitted: Vec<String> = request
            .evaluations
            .iter()
            .map(|e| e.request_id.clone())
            .collect();
        let response = self.check(request).await?;

        if response.evaluations.len() != submitted.len() {
            return Err(EnforcerError::ResultCountMismatch {
                expected: submitted.len(),
                actual: response.evaluations.len(),
            });
        }

        if let Some((index, denied)) = response.denied_evaluations().next() {
            return Err(EnforcerError::EvaluationDenied {
                index,
                request_id: submitted[index].clone(),
                context: denied.context.clone(),
            });
        }

        if !response.decision {
            return Err(EnforcerError::Denied {
                context: response.context,
            });
        }

        Ok(response)
    }
}

impl std::fmt::Debug for PolicyEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEnforcer").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::{
        Action, Evaluation, EvaluationResult, Principal, Reason, Resource, Subject,
    };

    /// Mock that permits everything and answers one result per evaluation.
    struct PermitMock;

    #[async_trait]
    impl AuthorizationClient for PermitMock {
        async fn check_authorization(
            &self,
            request: AuthorizationRequest,
        ) -> Result<AuthorizationResponse, PdpClientError> {
            Ok(AuthorizationResponse {
                decision: true,
                evaluations: request
                    .evaluations
                    .iter()
                    .map(|e| EvaluationResult {
                        request_id: e.request_id.clone(),
                        decision: true,
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            })
        }
    }

    /// Mock that denies the evaluation whose action name matches.
    struct DenyActionMock {
        action: &'static str,
    }

    #[async_trait]
    impl AuthorizationClient for DenyActionMock {
        async fn check_authorization(
            &self,
            request: AuthorizationRequest,
        ) -> Result<AuthorizationResponse, PdpClientError> {
            let denied_ctx = ContextDetail {
                id: "r1".to_owned(),
                reason_admin: Reason::new("E403", "denied by policy X"),
                reason_user: Reason::new("E403", "not allowed"),
            };
            let evaluations: Vec<_> = request
                .evaluations
                .iter()
                .map(|e| {
                    let permit = e.action.name != self.action;
                    EvaluationResult {
                        request_id: e.request_id.clone(),
                        decision: permit,
                        context: if permit {
                            ContextDetail::default()
                        } else {
                            denied_ctx.clone()
                        },
                    }
                })
                .collect();
            let atomic_denied = request
                .action
                .as_ref()
                .is_some_and(|a| a.name == self.action);
            let decision = !atomic_denied && evaluations.iter().all(|e| e.decision);
            Ok(AuthorizationResponse {
                decision,
                context: if decision {
                    ContextDetail::default()
                } else {
                    denied_ctx
                },
                evaluations,
                request_id: String::new(),
            })
        }
    }

    /// Mock that answers with no evaluation results at all.
    struct TruncatingMock;

    #[async_trait]
    impl AuthorizationClient for TruncatingMock {
        async fn check_authorization(
            &self,
            _request: AuthorizationRequest,
        ) -> Result<AuthorizationResponse, PdpClientError> {
            Ok(AuthorizationResponse {
                decision: true,
                ..Default::default()
            })
        }
    }

    /// Mock that always fails at the transport.
    struct FailMock;

    #[async_trait]
    impl AuthorizationClient for FailMock {
        async fn check_authorization(
            &self,
            _request: AuthorizationRequest,
        ) -> Result<AuthorizationResponse, PdpClientError> {
            Err(PdpClientError::transport(std::io::Error::other("boom")))
        }
    }

    fn enforcer(mock: impl AuthorizationClient + 'static) -> PolicyEnforcer {
        PolicyEnforcer::new(Arc::new(mock))
    }

    fn atomic(action: &str) -> AuthorizationRequest {
        AuthorizationRequest::atomic(
            1,
            "store",
            Principal::user("amy"),
            Subject::user("amy"),
            Resource::new("MagicFarmacia::Platform::Subscription"),
            Action::new(action),
        )
    }

    fn batch(actions: &[&str]) -> AuthorizationRequest {
        let evaluations = actions
            .iter()
            .enumerate()
            .map(|(i, a)| {
                Evaluation::new(
                    format!("eval-{i}"),
                    Subject::user("amy"),
                    Resource::new("MagicFarmacia::Platform::Subscription"),
                    Action::new(*a),
                )
            })
            .collect();
        AuthorizationRequest::batch(1, "store", Principal::user("amy"), evaluations)
    }

    #[tokio::test]
    async fn enforce_permits() {
        let response = enforcer(PermitMock).enforce(atomic("view")).await.unwrap();
        assert!(response.decision);
    }

    #[tokio::test]
    async fn enforce_denied_carries_reasons() {
        let result = enforcer(DenyActionMock { action: "create" })
            .enforce(atomic("create"))
            .await;

        match result {
            Err(EnforcerError::Denied { context }) => {
                assert_eq!(context.reason_user.message, "not allowed");
                assert_eq!(context.reason_admin.message, "denied by policy X");
            }
            other => panic!("Expected Denied, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_returns_denied_response_without_error() {
        let response = enforcer(DenyActionMock { action: "create" })
            .check(atomic("create"))
            .await
            .unwrap();
        assert!(!response.decision);
    }

    #[tokio::test]
    async fn enforce_all_reports_first_denied_evaluation() {
        let result = enforcer(DenyActionMock { action: "create" })
            .enforce_all(batch(&["view", "create", "create"]))
            .await;

        match result {
            Err(EnforcerError::EvaluationDenied {
                index, request_id, ..
            }) => {
                assert_eq!(index, 1);
                assert_eq!(request_id, "eval-1");
            }
            other => panic!("Expected EvaluationDenied, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn enforce_all_permits_full_batch() {
        let response = enforcer(PermitMock)
            .enforce_all(batch(&["view", "create"]))
            .await
            .unwrap();
        assert_eq!(response.evaluations.len(), 2);
    }

    #[tokio::test]
    async fn enforce_all_detects_result_count_mismatch() {
        let result = enforcer(TruncatingMock)
            .enforce_all(batch(&["view", "create"]))
            .await;

        assert!(matches!(
            result,
            Err(EnforcerError::ResultCountMismatch {
                expected: 2,
                actual: 0
            })
        ));
    }

    #[tokio::test]
    async fn enforce_all_atomic_falls_back_to_enforce() {
        let result = enforcer(DenyActionMock { action: "create" })
            .enforce_all(atomic("create"))
            .await;
        assert!(matches!(result, Err(EnforcerError::Denied { .. })));
    }

    #[tokio::test]
    async fn check_failure_is_wrapped() {
        let result = enforcer(FailMock).enforce(atomic("view")).await;
        assert!(matches!(
            result,
            Err(EnforcerError::CheckFailed(PdpClientError::Transport { .. }))
        ));
    }

    #[test]
    fn debug_impl() {
        let dbg = format!("{:?}", enforcer(PermitMock));
        assert!(dbg.contains("PolicyEnforcer"));
    }
}
