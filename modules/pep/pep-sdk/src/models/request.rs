//! Request-side models.
//!
//! An [`AuthorizationRequest`] runs in one of two modes:
//!
//! - **atomic**: `evaluations` is empty and the top-level
//!   subject/resource/action triple carries the single question;
//! - **batch**: `evaluations` is non-empty and each [`Evaluation`] is an
//!   independent question. Results come back in submission order.

use std::collections::HashMap;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Free-form key/value payload attached to subjects, resources, actions,
/// entity attributes and evaluation contexts.
pub type Properties = HashMap<String, serde_json::Value>;

/// Policy store type used by the atomic/batch constructors.
pub const POLICY_STORE_LEDGER: &str = "ledger";

/// Principal type used by [`Principal::user`].
pub const PRINCIPAL_TYPE_USER: &str = "user";

/// Entity schema dialect understood by the PDP.
pub const ENTITY_SCHEMA_CEDAR: &str = "cedar";

/// Identifies the policy repository to evaluate against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)] // `type` is a keyword
pub struct PolicyStore {
    /// Store type, e.g. `"ledger"`.
    #[serde(rename = "type", alias = "kind")]
    pub store_type: String,
    /// Store identifier. An empty id is passed through verbatim.
    pub id: String,
}

impl PolicyStore {
    #[must_use]
    pub fn new(store_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            store_type: store_type.into(),
            id: id.into(),
        }
    }

    /// A `ledger` policy store.
    #[must_use]
    pub fn ledger(id: impl Into<String>) -> Self {
        Self::new(POLICY_STORE_LEDGER, id)
    }
}

/// The authenticated caller asserting the request.
///
/// Tokens are kept as [`SecretString`] so that `Debug` output of a request
/// never contains them.
#[derive(Debug, Clone)]
pub struct Principal {
    pub principal_type: String,
    pub id: String,
    pub source: Option<String>,
    pub identity_token: Option<SecretString>,
    pub access_token: Option<SecretString>,
}

impl Principal {
    #[must_use]
    pub fn new(principal_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            principal_type: principal_type.into(),
            id: id.into(),
            source: None,
            identity_token: None,
            access_token: None,
        }
    }

    /// A principal of type `user`.
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self::new(PRINCIPAL_TYPE_USER, id)
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_identity_token(mut self, token: impl Into<SecretString>) -> Self {
        self.identity_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<SecretString>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

/// The entity whose permissions are evaluated.
///
/// May equal the [`Principal`] or differ from it (impersonation, service
/// identities).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Subject {
    #[serde(rename = "type")]
    pub subject_type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub properties: Properties,
}

impl Subject {
    #[must_use]
    pub fn new(subject_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            subject_type: subject_type.into(),
            id: id.into(),
            source: None,
            properties: Properties::new(),
        }
    }

    /// A subject of type `user`.
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self::new(PRINCIPAL_TYPE_USER, id)
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a single property.
    #[must_use]
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set all properties at once (replaces any previously set).
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}

/// The target of the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Resource {
    /// Resource type, e.g. `"MagicFarmacia::Platform::Subscription"`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Specific resource id. Optional for batch items addressing a type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Properties,
}

impl Resource {
    #[must_use]
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            properties: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}

/// The operation being authorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action name, e.g. `"MagicFarmacia::Platform::Action::create"`.
    pub name: String,
    #[serde(default)]
    pub properties: Properties,
}

impl Action {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}

/// Identity of a supplementary entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct EntityUid {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: String,
}

/// A supplementary domain object supplied inline so the PDP can evaluate
/// attribute-based conditions without a separate lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub uid: EntityUid,
    #[serde(default)]
    pub attrs: Properties,
    #[serde(default)]
    pub parents: Vec<serde_json::Value>,
}

impl Item {
    #[must_use]
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            uid: EntityUid {
                entity_type: entity_type.into(),
                id: id.into(),
            },
            attrs: Properties::new(),
            parents: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<serde_json::Value>) -> Self {
        self.parents.push(parent.into());
        self
    }
}

/// Entities payload: a schema dialect plus its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDetail {
    /// Entity/attribute model dialect, e.g. `"cedar"`.
    pub schema: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl EntityDetail {
    #[must_use]
    pub fn new(schema: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            schema: schema.into(),
            items,
        }
    }

    /// Entities in the `cedar` dialect.
    #[must_use]
    pub fn cedar(items: Vec<Item>) -> Self {
        Self::new(ENTITY_SCHEMA_CEDAR, items)
    }
}

/// One authorization question within a batch request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Caller-chosen id, required and unique within a batch.
    #[serde(default)]
    pub request_id: String,
    pub subject: Subject,
    pub resource: Resource,
    pub action: Action,
    #[serde(default)]
    pub context: Properties,
}

impl Evaluation {
    #[must_use]
    pub fn new(
        request_id: impl Into<String>,
        subject: Subject,
        resource: Resource,
        action: Action,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            subject,
            resource,
            action,
            context: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_context_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Properties) -> Self {
        self.context = context;
        self
    }
}

/// Mode of an [`AuthorizationRequest`], derived from its evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Single question carried by the top-level subject/resource/action.
    Atomic,
    /// One question per [`Evaluation`].
    Batch,
}

impl RequestMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Batch => "batch",
        }
    }
}

/// Top-level authorization request.
///
/// `zone_id == 0` and `policy_store == None` mean "not set"; the client fills
/// them from its configured defaults before the call.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Zone (application) id partitioning policy stores. `0` means unset.
    pub zone_id: i64,
    pub policy_store: Option<PolicyStore>,
    pub principal: Principal,
    pub entities: Option<EntityDetail>,
    /// Caller-chosen request id echoed back by the PDP.
    pub request_id: Option<String>,
    pub subject: Option<Subject>,
    pub resource: Option<Resource>,
    pub action: Option<Action>,
    pub context: Properties,
    pub evaluations: Vec<Evaluation>,
}

impl AuthorizationRequest {
    /// An empty request for `principal`; zone and policy store are left to
    /// the client defaults.
    #[must_use]
    pub fn new(principal: Principal) -> Self {
        Self {
            zone_id: 0,
            policy_store: None,
            principal,
            entities: None,
            request_id: None,
            subject: None,
            resource: None,
            action: None,
            context: Properties::new(),
            evaluations: Vec::new(),
        }
    }

    /// Atomic request against a `ledger` policy store.
    #[must_use]
    pub fn atomic(
        zone_id: i64,
        policy_store_id: impl Into<String>,
        principal: Principal,
        subject: Subject,
        resource: Resource,
        action: Action,
    ) -> Self {
        Self {
            zone_id,
            policy_store: Some(PolicyStore::ledger(policy_store_id)),
            subject: Some(subject),
            resource: Some(resource),
            action: Some(action),
            ..Self::new(principal)
        }
    }

    /// Batch request against a `ledger` policy store.
    #[must_use]
    pub fn batch(
        zone_id: i64,
        policy_store_id: impl Into<String>,
        principal: Principal,
        evaluations: Vec<Evaluation>,
    ) -> Self {
        Self {
            zone_id,
            policy_store: Some(PolicyStore::ledger(policy_store_id)),
            evaluations,
            ..Self::new(principal)
        }
    }

    #[must_use]
    pub fn mode(&self) -> RequestMode {
        if self.evaluations.is_empty() {
            RequestMode::Atomic
        } else {
            RequestMode::Batch
        }
    }

    #[must_use]
    pub fn with_zone_id(mut self, zone_id: i64) -> Self {
        self.zone_id = zone_id;
        self
    }

    #[must_use]
    pub fn with_policy_store(mut self, policy_store: PolicyStore) -> Self {
        self.policy_store = Some(policy_store);
        self
    }

    #[must_use]
    pub fn with_entities(mut self, entities: EntityDetail) -> Self {
        self.entities = Some(entities);
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn with_context_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Properties) -> Self {
        self.context = context;
        self
    }

    /// Append one evaluation (switches the request to batch mode).
    #[must_use]
    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluations.push(evaluation);
        self
    }
}
