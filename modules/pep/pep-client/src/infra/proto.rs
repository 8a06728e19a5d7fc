//! Wire messages and client stub for `policydecisionpoint.V1PDPService`,
//! generated by `build.rs` from `proto/pdp.proto`.
#![allow(clippy::all, clippy::pedantic, clippy::nursery, missing_docs)]

tonic::include_proto!("policydecisionpoint");

pub use v1pdp_service_client::V1pdpServiceClient;
