//! Infrastructure: wire messages and the gRPC transport.

pub mod grpc;
pub mod proto;
pub mod transport;

pub use grpc::GrpcPdpTransport;
pub use transport::PdpTransport;
