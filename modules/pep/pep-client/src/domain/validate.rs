//! Request validation and defaulting.

use std::collections::HashSet;

use pep_sdk::{AuthorizationRequest, PdpClientError, PolicyStore, RequestMode};

/// Client-level defaults applied to requests that leave them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDefaults {
    pub policy_store: Option<PolicyStore>,
    /// `0` means no default zone.
    pub zone_id: i64,
}

/// Fill unset zone id and policy store from `defaults`, then check that the
/// request can be sent.
///
/// An empty policy store id is not considered missing.
///
/// # Errors
///
/// - [`PdpClientError::MissingRequiredField`] naming every field still unset:
///   `zone_id`, `policy_store`, the atomic `subject`/`resource`/`action`, or
///   an empty `evaluations[i].request_id`
/// - [`PdpClientError::InvalidRequest`] if two evaluations share a request id
pub fn validate_and_default(
    mut request: AuthorizationRequest,
    defaults: &RequestDefaults,
) -> Result<AuthorizationRequest, PdpClientError> {
    if request.zone_id == 0 {
        request.zone_id = defaults.zone_id;
    }
    if request.policy_store.is_none() {
        request.policy_store.clone_from(&defaults.policy_store);
    }

    let mut missing = Vec::new();
    if request.zone_id == 0 {
        missing.push("zone_id".to_owned());
    }
    if request.policy_store.is_none() {
        missing.push("policy_store".to_owned());
    }

    match request.mode() {
        RequestMode::Atomic => {
            if request.subject.is_none() {
                missing.push("subject".to_owned());
            }
            if request.resource.is_none() {
                missing.push("resource".to_owned());
            }
            if request.action.is_none() {
                missing.push("action".to_owned());
            }
        }
        RequestMode::Batch => {
            for (i, evaluation) in request.evaluations.iter().enumerate() {
                if evaluation.request_id.is_empty() {
                    missing.push(format!("evaluations[{i}].request_id"));
                }
            }
        }
    }

    if !missing.is_empty() {
        return Err(PdpClientError::missing_fields(missing));
    }

    let mut seen = HashSet::with_capacity(request.evaluations.len());
    if let Some(duplicate) = request
        .evaluations
        .iter()
        .map(|e| e.request_id.as_str())
        .find(|id| !seen.insert(*id))
    {
        return Err(PdpClientError::invalid_request(format!(
            "duplicate evaluation request_id '{duplicate}'"
        )));
    }

    Ok(request)
}
