#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod contracts;
pub mod domain;
mod error;

// Re-export commonly used types for convenience
pub use contracts::{ErrorEnvelope, ErrorField, ErrorResponse, RequestEnvelope};
pub use domain::{MonitorHandle, Operation, SingleCheckResult};
pub use error::{CoreError, CoreResult};
