#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies used only by the integration tests
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tower as _;

pub mod config;
pub mod error;
pub mod forward;
pub mod server;

pub use config::{DEFAULT_ALLOWED_HEADERS, DEFAULT_UPSTREAM_URL, GatewayConfig};
pub use error::{GatewayError, GatewayResult};
pub use server::{create_router, serve};
