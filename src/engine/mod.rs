//! Collaboration engine module
//!
//! Defines the capability the gateway delegates to and the HTTP transport
//! used to reach a deployed engine.

mod remote;
mod traits;

pub use remote::RemoteEngine;
pub use traits::*;
