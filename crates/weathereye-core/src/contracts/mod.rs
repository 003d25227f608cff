//! Wire contracts shared by the gateway and the client broker.
//!
//! Everything in here is serialized onto the HTTP boundary, so field names
//! are part of the public protocol and must not be renamed casually.

mod error;
mod request;

pub use error::{ErrorEnvelope, ErrorField, ErrorResponse};
pub use request::RequestEnvelope;
