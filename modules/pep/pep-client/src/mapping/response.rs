//! Wire response → domain response.

use pep_sdk::{AuthorizationResponse, ContextDetail, EvaluationResult, Reason};

use crate::infra::proto;

/// Convert the wire `AuthorizationCheckResponse`.
///
/// Absent contexts and reasons become empty values, so every
/// [`ContextDetail`] carries both reasons.
#[must_use]
pub fn map_from_wire_response(response: proto::AuthorizationCheckResponse) -> AuthorizationResponse {
    AuthorizationResponse {
        decision: response.decision,
        context: map_context(response.context),
        evaluations: response
            .evaluations
            .into_iter()
            .map(map_evaluation)
            .collect(),
        request_id: response.request_id,
    }
}

fn map_evaluation(evaluation: proto::EvaluationResponse) -> EvaluationResult {
    EvaluationResult {
        request_id: evaluation.request_id,
        decision: evaluation.decision,
        context: map_context(evaluation.context),
    }
}

fn map_context(context: Option<proto::ContextResponse>) -> ContextDetail {
    let context = context.unwrap_or_default();
    ContextDetail {
        id: context.id,
        reason_admin: map_reason(context.reason_admin),
        reason_user: map_reason(context.reason_user),
    }
}

fn map_reason(reason: Option<proto::ReasonResponse>) -> Reason {
    reason.map_or_else(Reason::default, |r| Reason {
        code: r.code,
        message: r.message,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn reason(code: &str, message: &str) -> Option<proto::ReasonResponse> {
        Some(proto::ReasonResponse {
            code: code.to_owned(),
            message: message.to_owned(),
        })
    }

    #[test]
    fn denial_with_reasons_is_mapped() {
        let wire = proto::AuthorizationCheckResponse {
            request_id: "abc1".to_owned(),
            decision: false,
            context: Some(proto::ContextResponse {
                id: "ctx-1".to_owned(),
                reason_admin: reason("E403", "denied by policy X"),
                reason_user: reason("E403", "not allowed"),
            }),
            evaluations: Vec::new(),
        };

        let response = map_from_wire_response(wire);

        assert!(!response.decision);
        assert_eq!(response.request_id, "abc1");
        assert_eq!(response.context.id, "ctx-1");
        assert_eq!(response.context.reason_admin, Reason::new("E403", "denied by policy X"));
        assert_eq!(response.context.reason_user.message, "not allowed");
    }

    #[test]
    fn absent_context_yields_empty_reasons() {
        let response = map_from_wire_response(proto::AuthorizationCheckResponse {
            decision: true,
            ..Default::default()
        });

        assert!(response.decision);
        assert_eq!(response.context, ContextDetail::default());
        assert!(response.context.reason_user.is_empty());
        assert!(response.request_id.is_empty());
    }

    #[test]
    fn evaluations_are_mapped_in_order() {
        let wire = proto::AuthorizationCheckResponse {
            decision: false,
            evaluations: vec![
                proto::EvaluationResponse {
                    request_id: "1234".to_owned(),
                    decision: true,
                    context: None,
                },
                proto::EvaluationResponse {
                    request_id: "7890".to_owned(),
                    decision: false,
                    context: Some(proto::ContextResponse {
                        id: "e2".to_owned(),
                        reason_admin: None,
                        reason_user: reason("E403", "not allowed"),
                    }),
                },
            ],
            ..Default::default()
        };

        let response = map_from_wire_response(wire);

        assert_eq!(response.evaluations.len(), 2);
        assert_eq!(response.evaluations[0].request_id, "1234");
        assert!(response.evaluations[0].decision);
        assert_eq!(response.evaluations[1].request_id, "7890");
        assert!(!response.evaluations[1].decision);
        assert!(response.evaluations[1].context.reason_admin.is_empty());
        assert_eq!(response.evaluations[1].context.reason_user.code, "E403");
    }
}
