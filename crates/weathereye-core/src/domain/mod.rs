//! Domain types for the WeatherEye broker.
//!
//! These types are pure data: no HTTP client, no server framework.

mod operation;
mod results;

pub use operation::Operation;
pub use results::{MonitorHandle, SingleCheckResult};
