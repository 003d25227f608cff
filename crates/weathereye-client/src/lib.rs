#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies used only by the integration tests
#[cfg(test)]
use axum as _;
#[cfg(test)]
use weathereye_gateway as _;

mod client;
mod config;
mod controller;
mod digest;
mod error;
pub mod sse;

// ============================================================================
// Public API
// ============================================================================

pub use client::GatewayClient;
pub use config::{BrokerConfig, DEFAULT_GATEWAY_URL};
pub use controller::{DigestController, DigestStatus};
pub use digest::{DigestSession, SessionOutcome};
pub use error::{BrokerError, BrokerResult};
pub use sse::SseLineDecoder;

// Domain types callers need alongside the client
pub use weathereye_core::{MonitorHandle, SingleCheckResult};
