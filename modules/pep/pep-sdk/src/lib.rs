#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Permguard PEP SDK
//!
//! This crate provides the transport-agnostic public API of the PEP client:
//!
//! - [`AuthorizationClient`] - Public API trait for consumers
//! - [`AuthorizationRequest`], [`AuthorizationResponse`] - Request/response models
//! - [`PdpClientError`] - Error types
//! - [`pep`] - PEP helpers ([`PolicyEnforcer`])
//!
//! ## Usage
//!
//! ```ignore
//! use pep_sdk::{Action, AuthorizationRequest, Principal, Resource, Subject};
//!
//! let request = AuthorizationRequest::atomic(
//!     145_748_228_796,
//!     "5740a9c648a04f7db08ac2f44a3779da",
//!     Principal::user("amy.smith@acmecorp.com"),
//!     Subject::user("amy.smith@acmecorp.com"),
//!     Resource::new("MagicFarmacia::Platform::Subscription")
//!         .with_id("e3a786fd07e24bfa95ba4341d3695ae8"),
//!     Action::new("MagicFarmacia::Platform::Action::create"),
//! )
//! .with_context_property("isSuperUser", true);
//!
//! let response = client.check_authorization(request).await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod pep;

// Re-export main types at crate root
pub use api::AuthorizationClient;
pub use error::{BoxError, PdpClientError};
pub use models::{
    Action, AuthorizationRequest, AuthorizationResponse, ContextDetail, ENTITY_SCHEMA_CEDAR,
    EntityDetail, EntityUid, Evaluation, EvaluationResult, Item, POLICY_STORE_LEDGER,
    PRINCIPAL_TYPE_USER, PolicyStore, Principal, Properties, Reason, RequestMode, Resource,
    Subject,
};
pub use pep::{EnforcerError, PolicyEnforcer};
