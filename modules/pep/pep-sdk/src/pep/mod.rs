//! PEP (Policy Enforcement Point) helpers.
//!
//! - [`PolicyEnforcer`] - PEP object (call PDP → enforce decision)
//! - [`EnforcerError`] - denial and failure outcomes of enforcement

pub mod enforcer;

pub use enforcer::{EnforcerError, PolicyEnforcer};
