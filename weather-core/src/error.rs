use thiserror::Error;

/// A request field that failed its constraint.
///
/// The `Display` text is what the caller sees, so it is kept identical
/// whether the check runs in the validator or again in the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Tool arguments must be a JSON object")]
    NotAnObject,

    #[error("{0} is required and must be a number")]
    NotANumber(&'static str),

    #[error("Latitude must be between -90 and 90")]
    LatitudeOutOfRange,

    #[error("Longitude must be between -180 and 180")]
    LongitudeOutOfRange,

    #[error("Date is required and must be a string")]
    DateNotAString,

    #[error("Date must be in YYYY-MM-DD format")]
    InvalidDate,

    #[error("Units must be one of: metric, imperial, kelvin")]
    InvalidUnits,

    #[error("Response format must be one of: markdown, json")]
    InvalidResponseFormat,

    #[error("Unrecognized field: {0}")]
    UnknownField(String),
}

/// Every way a single weather lookup can fail short of a protocol mistake.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error("Weather API key not configured. Please set WEATHER_API_KEY environment variable.")]
    MissingApiKey,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Upstream answered with a non-success status.
    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Error formatting weather data: {0}")]
    Normalization(String),
}

impl WeatherError {
    /// Prefer the provider's own message, fall back to the status code.
    pub fn provider(status: u16, message: Option<String>) -> Self {
        let message =
            message.unwrap_or_else(|| format!("Request failed with status code {status}"));
        Self::Provider { status, message }
    }
}

/// Caller mistakes at the protocol level. These are never folded into a
/// tool error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}
