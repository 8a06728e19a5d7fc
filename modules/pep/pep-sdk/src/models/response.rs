//! Response-side models.
//!
//! Every [`ContextDetail`] carries both reasons, possibly empty, so callers can
//! always read `response.context.reason_user.message` without checking for
//! absence.

use serde::{Deserialize, Serialize};

/// Explanation of a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    /// Machine-readable code, e.g. `"E403"`.
    pub code: String,
    pub message: String,
}

impl Reason {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether both code and message are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.message.is_empty()
    }
}

/// Decision context returned by the PDP.
///
/// `reason_admin` may carry details that must not reach the end user;
/// `reason_user` is safe to display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDetail {
    pub id: String,
    pub reason_admin: Reason,
    pub reason_user: Reason,
}

/// Outcome of one submitted evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Request id echoed by the PDP, empty when not sent back.
    #[serde(default)]
    pub request_id: String,
    pub decision: bool,
    #[serde(default)]
    pub context: ContextDetail,
}

/// Top-level authorization response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    /// Overall decision. In batch mode the PDP permits only when every
    /// evaluation is permitted.
    pub decision: bool,
    #[serde(default)]
    pub context: ContextDetail,
    /// One result per submitted evaluation, in submission order.
    #[serde(default)]
    pub evaluations: Vec<EvaluationResult>,
    #[serde(default)]
    pub request_id: String,
}

impl AuthorizationResponse {
    #[must_use]
    pub fn is_permitted(&self) -> bool {
        self.decision
    }

    /// Evaluations the PDP denied, with their submission index.
    pub fn denied_evaluations(&self) -> impl Iterator<Item = (usize, &EvaluationResult)> {
        self.evaluations
            .iter()
            .enumerate()
            .filter(|(_, eval)| !eval.decision)
    }
}
