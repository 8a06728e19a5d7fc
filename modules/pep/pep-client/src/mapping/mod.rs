//! Mapping between the domain model and the PDP wire schema.

pub mod request;
pub mod response;
pub mod value;

pub use request::map_to_wire_request;
pub use response::map_from_wire_response;
pub use value::{from_wire_struct, from_wire_value, to_wire_struct, to_wire_value};
