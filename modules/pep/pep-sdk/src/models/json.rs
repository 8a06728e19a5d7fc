//! JSON loading for [`AuthorizationRequest`].
//!
//! Accepts the PDP's JSON envelope, where zone, policy store, principal and
//! entities live under `authorization_model`:
//!
//! ```json
//! {
//!   "authorization_model": {
//!     "zone_id": 611159836099,
//!     "policy_store": { "kind": "ledger", "id": "f96586c317c74aaaae4ff2ba2fef0459" },
//!     "principal": { "type": "user", "id": "amy.smith@acmecorp.com", "source": "keycloak" },
//!     "entities": { "schema": "cedar", "items": [] }
//!   },
//!   "request_id": "abc1",
//!   "subject": { "type": "user", "id": "amy.smith@acmecorp.com" },
//!   "resource": { "type": "MagicFarmacia::Platform::Subscription", "id": "e3a786fd07e24bfa95ba4341d3695ae8" },
//!   "action": { "name": "MagicFarmacia::Platform::Action::create" },
//!   "context": { "isSubscriptionActive": true }
//! }
//! ```

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use super::request::{
    Action, AuthorizationRequest, EntityDetail, Evaluation, PRINCIPAL_TYPE_USER, PolicyStore,
    Principal, Properties, Resource, Subject,
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthorizationRequestJson {
    authorization_model: AuthorizationModelJson,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    subject: Option<Subject>,
    #[serde(default)]
    resource: Option<Resource>,
    #[serde(default)]
    action: Option<Action>,
    #[serde(default)]
    context: Properties,
    #[serde(default)]
    evaluations: Vec<Evaluation>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthorizationModelJson {
    #[serde(default)]
    zone_id: i64,
    #[serde(default)]
    policy_store: Option<PolicyStore>,
    principal: PrincipalJson,
    #[serde(default)]
    entities: Option<EntityDetail>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PrincipalJson {
    #[serde(rename = "type", default = "default_principal_type")]
    principal_type: String,
    id: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    identity_token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

fn default_principal_type() -> String {
    PRINCIPAL_TYPE_USER.to_owned()
}

impl From<PrincipalJson> for Principal {
    fn from(p: PrincipalJson) -> Self {
        Self {
            principal_type: p.principal_type,
            id: p.id,
            source: p.source,
            identity_token: p.identity_token.map(SecretString::from),
            access_token: p.access_token.map(SecretString::from),
        }
    }
}

impl From<AuthorizationRequestJson> for AuthorizationRequest {
    fn from(json: AuthorizationRequestJson) -> Self {
        let model = json.authorization_model;
        Self {
            zone_id: model.zone_id,
            policy_store: model.policy_store,
            principal: model.principal.into(),
            entities: model.entities,
            request_id: json.request_id,
            subject: json.subject,
            resource: json.resource,
            action: json.action,
            context: json.context,
            evaluations: json.evaluations,
        }
    }
}

impl<'de> Deserialize<'de> for AuthorizationRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        AuthorizationRequestJson::deserialize(deserializer).map(Into::into)
    }
}

impl AuthorizationRequest {
    /// Parse a request from its JSON envelope.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the payload is not valid JSON or
    /// does not match the envelope.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a request from JSON bytes.
    ///
    /// # Errors
    ///
    /// Same as [`AuthorizationRequest::from_json_str`].
    pub fn from_json_slice(json: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(json)
    }
}
