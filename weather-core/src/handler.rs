//! The `openweather_get_weather` tool: validate, fetch, render, answer.

use futures::FutureExt;
use serde::Serialize;
use serde_json::{Value, json};
use std::{
    any::Any,
    panic::AssertUnwindSafe,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    Config,
    config::Profile,
    error::ProtocolError,
    model::{ResponseFormat, Units, WeatherRequest, whole_as_integer},
    provider::{client_from_config, openweather::OpenWeatherClient},
    render::{render_json, render_markdown},
    validate::validate_value,
};

pub const TOOL_NAME: &str = "openweather_get_weather";
pub const TOOL_TITLE: &str = "Get OpenWeather Data";
pub const TOOL_DESCRIPTION: &str = "\
Get historical or current weather data for a specific location using OpenWeather API.

This tool retrieves comprehensive weather information including temperature, humidity, pressure,
wind, precipitation, and cloud cover for any geographic coordinates on a specified date.

Args:
  - latitude (number): Latitude coordinate between -90 and 90 (e.g., 40.7128 for New York City)
  - longitude (number): Longitude coordinate between -180 and 180 (e.g., -74.0060 for New York City)
  - date (string): Date in YYYY-MM-DD format (e.g., \"2024-01-15\")
  - units (string): \"metric\" (Celsius), \"imperial\" (Fahrenheit), or \"kelvin\" (default: \"metric\")
  - response_format (string): \"markdown\" for human-readable or \"json\" for structured data (default: \"markdown\")

Returns:
  For JSON format: location {latitude, longitude, timezone}, date, units, temperature
  (min/max/morning/afternoon/evening/night, each {value, unit}), humidity, pressure and
  cloud_cover ({afternoon, unit}), precipitation ({total, unit}) and wind
  ({max: {speed, direction, speed_unit, direction_unit}}).
  For Markdown format: Human-readable formatted text with headers and sections.

Examples:
  - \"What was the weather in Paris on January 1st, 2024?\"
    -> {latitude: 48.8566, longitude: 2.3522, date: \"2024-01-01\"}
  - \"Get temperature data for Tokyo today in Fahrenheit\"
    -> {latitude: 35.6762, longitude: 139.6503, date: \"2025-10-18\", units: \"imperial\"}
  - Don't use for multi-day forecasts: this returns a single-day summary only.

Error Handling:
  - \"Weather API key not configured\" if WEATHER_API_KEY is not set
  - \"Latitude must be between -90 and 90\" / \"Longitude must be between -180 and 180\"
  - \"Date must be in YYYY-MM-DD format\" for malformed dates
  - The provider's own message for upstream or network failures";

/// Metadata attached to successful responses when the profile tracks invocations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMeta {
    #[serde(serialize_with = "whole_as_integer")]
    pub latitude: f64,
    #[serde(serialize_with = "whole_as_integer")]
    pub longitude: f64,
    pub date: String,
    pub units: Units,
    /// Invocation number this response belongs to, starting at 1.
    pub invocation: u64,
}

/// Uniform envelope for every tool outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    pub text: String,
    pub is_error: bool,
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug)]
pub struct WeatherTool {
    client: OpenWeatherClient,
    profile: Profile,
    invocations: AtomicU64,
}

impl WeatherTool {
    pub fn new(client: OpenWeatherClient, profile: Profile) -> Self {
        Self { client, profile, invocations: AtomicU64::new(0) }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(client_from_config(config)?, config.profile))
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn has_api_key(&self) -> bool {
        self.client.has_api_key()
    }

    /// Number of calls to this tool so far.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }

    /// JSON schema advertised for the tool's arguments.
    pub fn input_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "latitude": {
                    "type": "number",
                    "minimum": -90,
                    "maximum": 90,
                    "description": "Latitude coordinate"
                },
                "longitude": {
                    "type": "number",
                    "minimum": -180,
                    "maximum": 180,
                    "description": "Longitude coordinate"
                },
                "date": {
                    "type": "string",
                    "pattern": "^\\d{4}-\\d{2}-\\d{2}$",
                    "description": "Date in YYYY-MM-DD format"
                },
                "units": {
                    "type": "string",
                    "enum": ["metric", "imperial", "kelvin"],
                    "default": "metric",
                    "description": "Temperature units"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown",
                    "description": "Output format: 'markdown' for human-readable or 'json' for machine-readable"
                }
            },
            "required": ["latitude", "longitude", "date"],
            "additionalProperties": false
        })
    }

    /// Run one invocation of `name` with raw `arguments`.
    ///
    /// Only an unknown tool name is an `Err`. Every other failure, including
    /// a panic further down, comes back as an error envelope.
    pub async fn call(&self, name: &str, arguments: &Value) -> Result<ToolResponse, ProtocolError> {
        if name != TOOL_NAME {
            return Err(ProtocolError::UnknownTool(name.to_string()));
        }

        let invocation = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;

        let response = AssertUnwindSafe(self.run(arguments, invocation))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let message = panic_message(panic.as_ref());
                tracing::error!(invocation, %message, "weather tool panicked");
                self.error_response(&message)
            });

        Ok(response)
    }

    async fn run(&self, arguments: &Value, invocation: u64) -> ToolResponse {
        let request = match validate_value(arguments) {
            Ok(request) => request,
            Err(e) => {
                tracing::info!(invocation, error = %e, "rejected weather request");
                return self.error_response(&e.to_string());
            }
        };

        tracing::info!(
            invocation,
            latitude = request.latitude(),
            longitude = request.longitude(),
            date = request.date(),
            units = %request.units(),
            format = %request.response_format(),
            "fetching weather"
        );

        let report = match self.client.fetch(&request).await {
            Ok(report) => report,
            Err(e) => return self.error_response(&e.to_string()),
        };

        let text = match request.response_format() {
            ResponseFormat::Json => match render_json(&report) {
                Ok(text) => text,
                Err(e) => return self.error_response(&e.to_string()),
            },
            ResponseFormat::Markdown => render_markdown(&report, self.profile.render_style()),
        };

        ToolResponse {
            text,
            is_error: false,
            meta: self.profile.tracks_invocations().then(|| meta(&request, invocation)),
        }
    }

    fn error_response(&self, message: &str) -> ToolResponse {
        let text = match self.profile {
            Profile::Plain => format!("Error: {message}"),
            Profile::Decorated => format!("❌ Error: {message}"),
        };
        ToolResponse { text, is_error: true, meta: None }
    }
}

fn meta(request: &WeatherRequest, invocation: u64) -> ResponseMeta {
    ResponseMeta {
        latitude: request.latitude(),
        longitude: request.longitude(),
        date: request.date().to_string(),
        units: request.units(),
        invocation,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown error".to_string()
    }
}
