#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use pep_client::infra::proto::{
    AuthorizationCheckRequest, AuthorizationCheckResponse, ContextResponse, EvaluationResponse,
    ReasonResponse,
};
use pep_client::{PdpClient, PdpTransport, RequestDefaults};
use pep_sdk::{Action, AuthorizationRequest, Evaluation, PolicyStore, Principal, Resource, Subject};

pub const ZONE_ID: i64 = 611_159_836_099;
pub const STORE_ID: &str = "f96586c317c74aaaae4ff2ba2fef0459";
pub const AMY: &str = "amy.smith@acmecorp.com";
pub const SUBSCRIPTION: &str = "MagicFarmacia::Platform::Subscription";
pub const SUBSCRIPTION_ID: &str = "e3a786fd07e24bfa95ba4341d3695ae8";

type Responder =
    Box<dyn Fn(&AuthorizationCheckRequest) -> Result<AuthorizationCheckResponse, tonic::Status> + Send + Sync>;

/// In-memory PDP recording every request it receives.
pub struct MockPdp {
    calls: Mutex<Vec<AuthorizationCheckRequest>>,
    respond: Responder,
}

impl MockPdp {
    pub fn new(
        respond: impl Fn(&AuthorizationCheckRequest) -> Result<AuthorizationCheckResponse, tonic::Status>
        + Send
        + Sync
        + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    /// Permits everything, echoing request ids.
    pub fn permit_all() -> Arc<Self> {
        Self::new(|req| {
            Ok(AuthorizationCheckResponse {
                request_id: req.request_id.clone(),
                decision: true,
                context: None,
                evaluations: req
                    .evaluations
                    .iter()
                    .map(|e| EvaluationResponse {
                        request_id: e.request_id.clone(),
                        decision: true,
                        context: None,
                    })
                    .collect(),
            })
        })
    }

    /// Denies with an `E403` context.
    pub fn deny_all() -> Arc<Self> {
        Self::new(|req| {
            Ok(AuthorizationCheckResponse {
                request_id: req.request_id.clone(),
                decision: false,
                context: Some(denied_context()),
                evaluations: Vec::new(),
            })
        })
    }

    pub fn calls(&self) -> Vec<AuthorizationCheckRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl PdpTransport for MockPdp {
    async fn authorization_check(
        &self,
        request: AuthorizationCheckRequest,
    ) -> Result<AuthorizationCheckResponse, tonic::Status> {
        let response = (self.respond)(&request);
        self.calls.lock().push(request);
        response
    }
}

pub fn denied_context() -> ContextResponse {
    ContextResponse {
        id: "ctx-403".to_owned(),
        reason_admin: Some(ReasonResponse {
            code: "E403".to_owned(),
            message: "denied by policy X".to_owned(),
        }),
        reason_user: Some(ReasonResponse {
            code: "E403".to_owned(),
            message: "not allowed".to_owned(),
        }),
    }
}

pub fn client_over(mock: &Arc<MockPdp>, defaults: RequestDefaults) -> PdpClient {
    PdpClient::with_transport(mock.clone(), defaults)
}

pub fn scenario_defaults() -> RequestDefaults {
    RequestDefaults {
        policy_store: Some(PolicyStore::ledger(STORE_ID)),
        zone_id: ZONE_ID,
    }
}

pub fn amy() -> Principal {
    Principal::user(AMY).with_source("keycloak")
}

pub fn subscription_evaluation(request_id: &str, action: &str) -> Evaluation {
    Evaluation::new(
        request_id,
        Subject::user(AMY).with_source("keycloak"),
        Resource::new(SUBSCRIPTION).with_id(SUBSCRIPTION_ID),
        Action::new(action),
    )
}

/// The MagicFarmacia "create subscription" atomic request.
pub fn magicfarmacia_atomic() -> AuthorizationRequest {
    AuthorizationRequest::atomic(
        ZONE_ID,
        STORE_ID,
        amy(),
        Subject::user(AMY)
            .with_source("keycloak")
            .with_property("isSuperUser", true),
        Resource::new(SUBSCRIPTION)
            .with_id(SUBSCRIPTION_ID)
            .with_property("isEnabled", true),
        Action::new("MagicFarmacia::Platform::Action::create").with_property("isEnabled", true),
    )
    .with_request_id("abc1")
    .with_context_property("time", "2025-01-23T16:17:46+00:00")
    .with_context_property("isSubscriptionActive", true)
    .with_context_property("isSuperUser", true)
}
