//! Core library for the `openweather-mcp` tool server.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Validation of raw tool arguments
//! - The OpenWeather day-summary client and its normalization
//! - JSON and Markdown rendering of the canonical report
//! - The tool handler that ties them together
//!
//! It is used by the `openweather-mcp` binary, which only adds transport and
//! bootstrap around [`WeatherTool`].

pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod provider;
pub mod render;
pub mod validate;

#[cfg(test)]
mod testutils;

pub use config::{Config, Profile};
pub use error::{ProtocolError, ValidationError, WeatherError};
pub use handler::{ResponseMeta, TOOL_NAME, ToolResponse, WeatherTool};
pub use model::{ResponseFormat, Units, WeatherReport, WeatherRequest, WeatherResult};
pub use provider::{Upstream, UpstreamQuery, UpstreamReply};
