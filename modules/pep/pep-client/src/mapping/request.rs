//! Domain request → wire request.

use pep_sdk::{
    Action, AuthorizationRequest, EntityDetail, Evaluation, PdpClientError, PolicyStore, Principal,
    Resource, Subject,
};
use prost_types::Struct;
use secrecy::ExposeSecret;

use super::value::to_wire_struct;
use crate::infra::proto;

/// Build the wire `AuthorizationCheckRequest`.
///
/// In batch mode every evaluation is mapped in submission order and the first
/// one is echoed into the top-level subject/resource/action/context. In atomic
/// mode the top-level fields come from the request and `evaluations` is empty.
/// Properties, attributes and contexts are always sent as a struct, empty when
/// unset.
///
/// # Errors
///
/// [`PdpClientError::UnsupportedValueType`] if any payload value cannot be
/// converted; no wire message is produced in that case.
pub fn map_to_wire_request(
    request: &AuthorizationRequest,
) -> Result<proto::AuthorizationCheckRequest, PdpClientError> {
    let authorization_model = proto::AuthorizationModelRequest {
        zone_id: request.zone_id,
        policy_store: Some(
            request
                .policy_store
                .as_ref()
                .map(map_policy_store)
                .unwrap_or_default(),
        ),
        principal: Some(map_principal(&request.principal)),
        entities: request.entities.as_ref().map(map_entities).transpose()?,
    };

    let evaluations = request
        .evaluations
        .iter()
        .map(map_evaluation)
        .collect::<Result<Vec<_>, _>>()?;

    let (subject, resource, action, context) = if let Some(first) = evaluations.first() {
        (
            first.subject.clone(),
            first.resource.clone(),
            first.action.clone(),
            first.context.clone(),
        )
    } else {
        (
            Some(map_optional(request.subject.as_ref(), map_subject)?),
            Some(map_optional(request.resource.as_ref(), map_resource)?),
            Some(map_optional(request.action.as_ref(), map_action)?),
            Some(to_wire_struct(&request.context)?),
        )
    };

    let request_id = request
        .request_id
        .clone()
        .or_else(|| request.evaluations.first().map(|e| e.request_id.clone()))
        .unwrap_or_default();

    Ok(proto::AuthorizationCheckRequest {
        request_id,
        authorization_model: Some(authorization_model),
        subject,
        resource,
        action,
        context,
        evaluations,
    })
}

/// Map a present value, or fall back to the empty wire message whose
/// payload struct is still set.
fn map_optional<T, W>(
    value: Option<&T>,
    map: fn(&T) -> Result<W, PdpClientError>,
) -> Result<W, PdpClientError>
where
    W: EmptyWire,
{
    value.map_or_else(|| Ok(W::empty()), map)
}

trait EmptyWire {
    fn empty() -> Self;
}

impl EmptyWire for proto::Subject {
    fn empty() -> Self {
        Self {
            properties: Some(Struct::default()),
            ..Self::default()
        }
    }
}

impl EmptyWire for proto::Resource {
    fn empty() -> Self {
        Self {
            properties: Some(Struct::default()),
            ..Self::default()
        }
    }
}

impl EmptyWire for proto::Action {
    fn empty() -> Self {
        Self {
            properties: Some(Struct::default()),
            ..Self::default()
        }
    }
}

fn map_policy_store(store: &PolicyStore) -> proto::PolicyStore {
    proto::PolicyStore {
        r#type: store.store_type.clone(),
        id: store.id.clone(),
    }
}

fn map_principal(principal: &Principal) -> proto::Principal {
    proto::Principal {
        r#type: principal.principal_type.clone(),
        id: principal.id.clone(),
        source: principal.source.clone(),
        identity_token: principal
            .identity_token
            .as_ref()
            .map(|t| t.expose_secret().to_owned()),
        access_token: principal
            .access_token
            .as_ref()
            .map(|t| t.expose_secret().to_owned()),
    }
}

fn map_entities(entities: &EntityDetail) -> Result<proto::Entities, PdpClientError> {
    Ok(proto::Entities {
        schema: entities.schema.clone(),
        // Item serializes as {uid: {type, id}, attrs, parents}
        items: entities
            .items
            .iter()
            .map(to_wire_struct)
            .collect::<Result<_, _>>()?,
    })
}

fn map_subject(subject: &Subject) -> Result<proto::Subject, PdpClientError> {
    Ok(proto::Subject {
        r#type: subject.subject_type.clone(),
        id: subject.id.clone(),
        source: subject.source.clone(),
        properties: Some(to_wire_struct(&subject.properties)?),
    })
}

fn map_resource(resource: &Resource) -> Result<proto::Resource, PdpClientError> {
    Ok(proto::Resource {
        r#type: resource.resource_type.clone(),
        id: resource.id.clone().unwrap_or_default(),
        properties: Some(to_wire_struct(&resource.properties)?),
    })
}

fn map_action(action: &Action) -> Result<proto::Action, PdpClientError> {
    Ok(proto::Action {
        name: action.name.clone(),
        properties: Some(to_wire_struct(&action.properties)?),
    })
}

fn map_evaluation(evaluation: &Evaluation) -> Result<proto::EvaluationRequest, PdpClientError> {
    Ok(proto::EvaluationRequest {
        request_id: evaluation.request_id.clone(),
        subject: Some(map_subject(&evaluation.subject)?),
        resource: Some(map_resource(&evaluation.resource)?),
        action: Some(map_action(&evaluation.action)?),
        context: Some(to_wire_struct(&evaluation.context)?),
    })
}
