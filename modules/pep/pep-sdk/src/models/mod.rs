//! Domain models for the PEP.
//!
//! Shaped after the PDP's `AuthZEN`-style model: principal, subject,
//! resource, action and context, plus inline entities and batched
//! evaluations.

mod json;
pub mod request;
pub mod response;

pub use request::{
    Action, AuthorizationRequest, ENTITY_SCHEMA_CEDAR, EntityDetail, EntityUid, Evaluation, Item,
    POLICY_STORE_LEDGER, PRINCIPAL_TYPE_USER, PolicyStore, Principal, Properties, RequestMode,
    Resource, Subject,
};
pub use response::{AuthorizationResponse, ContextDetail, EvaluationResult, Reason};
