//! Permguard PEP client
//!
//! Sends [`AuthorizationRequest`](pep_sdk::AuthorizationRequest)s to a
//! Permguard Policy Decision Point over gRPC
//! (`policydecisionpoint.V1PDPService/AuthorizationCheck`):
//!
//! validate and default → map to the wire request → invoke → map the
//! response back.
//!
//! - [`PdpClient`] - async facade, implements [`pep_sdk::AuthorizationClient`]
//! - [`BlockingPdpClient`] - blocking facade with its own runtime
//! - [`PdpClientConfig`] - endpoint and request defaults, loadable with figment
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod blocking;
pub mod client;
pub mod config;
pub mod domain;
pub mod infra;
pub mod mapping;

pub use blocking::BlockingPdpClient;
pub use client::{ClientState, PdpClient};
pub use config::PdpClientConfig;
pub use domain::{RequestDefaults, validate_and_default};
pub use infra::{GrpcPdpTransport, PdpTransport};
