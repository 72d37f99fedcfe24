use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::{ValidationError, WeatherError};

/// Unit system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Kelvin,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Kelvin => "kelvin",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Kelvin]
    }

    pub fn temperature_unit(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Kelvin => "K",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Kelvin => "m/s",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "kelvin" => Ok(Units::Kelvin),
            _ => Err(ValidationError::InvalidUnits),
        }
    }
}

/// Output format for a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Markdown,
    Json,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Markdown => "markdown",
            ResponseFormat::Json => "json",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ResponseFormat {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "markdown" => Ok(ResponseFormat::Markdown),
            "json" => Ok(ResponseFormat::Json),
            _ => Err(ValidationError::InvalidResponseFormat),
        }
    }
}

/// A tool request whose fields have all passed validation.
///
/// Only [`crate::validate`] builds one, so holding a `WeatherRequest` means
/// every constraint already holds.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) date: String,
    pub(crate) units: Units,
    pub(crate) response_format: ResponseFormat,
}

impl WeatherRequest {
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn response_format(&self) -> ResponseFormat {
        self.response_format
    }
}

/// Outcome of one provider lookup.
pub type WeatherResult = Result<WeatherReport, WeatherError>;

/// Canonical day summary, independent of how it is rendered.
///
/// Sub-blocks are optional only so the renderer can cope with a partial
/// report; the client always fills every one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Location,
    pub date: String,
    pub units: Units,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Temperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<AfternoonReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<AfternoonReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<AfternoonReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<Precipitation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<Wind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(serialize_with = "whole_as_integer")]
    pub latitude: f64,
    #[serde(serialize_with = "whole_as_integer")]
    pub longitude: f64,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(serialize_with = "whole_as_integer")]
    pub value: f64,
    pub unit: String,
}

impl Reading {
    pub fn new(value: f64, unit: &str) -> Self {
        Self { value, unit: unit.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub min: Reading,
    pub max: Reading,
    pub morning: Reading,
    pub afternoon: Reading,
    pub evening: Reading,
    pub night: Reading,
}

/// Humidity, pressure and cloud cover are all reported for the afternoon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfternoonReading {
    #[serde(serialize_with = "whole_as_integer")]
    pub afternoon: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(serialize_with = "whole_as_integer")]
    pub total: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub max: WindReading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindReading {
    #[serde(serialize_with = "whole_as_integer")]
    pub speed: f64,
    #[serde(serialize_with = "whole_as_integer")]
    pub direction: f64,
    pub speed_unit: String,
    pub direction_unit: String,
}

/// Write whole numbers without a fractional part, so `81.0` goes out as `81`.
///
/// Only values exactly representable as integers in an `f64` are narrowed.
pub(crate) fn whole_as_integer<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if value.fract() == 0.0 && value.abs() < MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
