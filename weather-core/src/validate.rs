//! Checks raw tool arguments and builds a [`WeatherRequest`].
//!
//! The individual checks are public so the client can repeat them on its own
//! inputs and produce the exact same messages.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::error::ValidationError;
use crate::model::{ResponseFormat, Units, WeatherRequest};

/// Argument names the tool accepts. Anything else is rejected.
pub const KNOWN_FIELDS: &[&str] = &["latitude", "longitude", "date", "units", "response_format"];

pub fn check_latitude(latitude: f64) -> Result<f64, ValidationError> {
    if (-90.0..=90.0).contains(&latitude) {
        Ok(latitude)
    } else {
        Err(ValidationError::LatitudeOutOfRange)
    }
}

pub fn check_longitude(longitude: f64) -> Result<f64, ValidationError> {
    if (-180.0..=180.0).contains(&longitude) {
        Ok(longitude)
    } else {
        Err(ValidationError::LongitudeOutOfRange)
    }
}

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"));

/// `YYYY-MM-DD` with ASCII digits. No calendar check.
pub fn check_date(date: &str) -> Result<&str, ValidationError> {
    if DATE_RE.is_match(date) { Ok(date) } else { Err(ValidationError::InvalidDate) }
}

/// Validate a raw argument value, which must be a JSON object.
pub fn validate_value(arguments: &Value) -> Result<WeatherRequest, ValidationError> {
    match arguments {
        Value::Object(map) => validate_arguments(map),
        _ => Err(ValidationError::NotAnObject),
    }
}

/// Validate tool arguments in a fixed order: latitude, longitude, date,
/// units, response format, then unknown fields. The first failure wins.
pub fn validate_arguments(
    arguments: &Map<String, Value>,
) -> Result<WeatherRequest, ValidationError> {
    let latitude = number_field(arguments, "latitude", "Latitude")?;
    check_latitude(latitude)?;

    let longitude = number_field(arguments, "longitude", "Longitude")?;
    check_longitude(longitude)?;

    let date = arguments
        .get("date")
        .and_then(Value::as_str)
        .ok_or(ValidationError::DateNotAString)?;
    check_date(date)?;

    let units = match arguments.get("units") {
        None => Units::default(),
        Some(value) => value
            .as_str()
            .ok_or(ValidationError::InvalidUnits)
            .and_then(Units::try_from)?,
    };

    let response_format = match arguments.get("response_format") {
        None => ResponseFormat::default(),
        Some(value) => value
            .as_str()
            .ok_or(ValidationError::InvalidResponseFormat)
            .and_then(ResponseFormat::try_from)?,
    };

    if let Some(extra) = arguments.keys().find(|k| !KNOWN_FIELDS.contains(&k.as_str())) {
        return Err(ValidationError::UnknownField(extra.clone()));
    }

    Ok(WeatherRequest {
        latitude,
        longitude,
        date: date.to_string(),
        units,
        response_format,
    })
}

fn number_field(
    arguments: &Map<String, Value>,
    key: &str,
    label: &'static str,
) -> Result<f64, ValidationError> {
    arguments
        .get(key)
        .and_then(Value::as_f64)
        .ok_or(ValidationError::NotANumber(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn applies_defaults_for_optional_fields() {
        let req = validate_arguments(&args(json!({
            "latitude": 48.8566,
            "longitude": 2.3522,
            "date": "2024-01-01"
        })))
        .expect("request should validate");

        assert_eq!(req.latitude(), 48.8566);
        assert_eq!(req.longitude(), 2.3522);
        assert_eq!(req.date(), "2024-01-01");
        assert_eq!(req.units(), Units::Metric);
        assert_eq!(req.response_format(), ResponseFormat::Markdown);
    }

    #[test]
    fn accepts_explicit_options_and_integer_coordinates() {
        let req = validate_arguments(&args(json!({
            "latitude": -90,
            "longitude": 180,
            "date": "2025-10-18",
            "units": "imperial",
            "response_format": "json"
        })))
        .expect("request should validate");

        assert_eq!(req.latitude(), -90.0);
        assert_eq!(req.longitude(), 180.0);
        assert_eq!(req.units(), Units::Imperial);
        assert_eq!(req.response_format(), ResponseFormat::Json);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let err = validate_arguments(&args(json!({
            "latitude": 95, "longitude": 0, "date": "2024-01-01"
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "Latitude must be between -90 and 90");

        let err = validate_arguments(&args(json!({
            "latitude": 0, "longitude": -180.5, "date": "2024-01-01"
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "Longitude must be between -180 and 180");
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let err = validate_arguments(&args(json!({
            "latitude": "48.8", "longitude": 2.3, "date": "2024-01-01"
        })))
        .unwrap_err();
        assert_eq!(err, ValidationError::NotANumber("Latitude"));
        assert!(err.to_string().starts_with("Latitude"));

        let err = validate_arguments(&args(json!({ "latitude": 1.0, "date": "2024-01-01" })))
            .unwrap_err();
        assert_eq!(err, ValidationError::NotANumber("Longitude"));
    }

    #[test]
    fn date_pattern_only_checks_shape() {
        assert!(check_date("2024-02-31").is_ok());
        assert!(check_date("0000-00-00").is_ok());

        let bad_dates = [
            "2024-1-01",
            "24-01-01",
            "2024/01/01",
            "2024-01-01T00:00",
            "2024-01-01\n",
            "",
            "２０２４-01-01",
        ];
        for bad in bad_dates {
            assert_eq!(check_date(bad), Err(ValidationError::InvalidDate), "{bad}");
        }
    }

    #[test]
    fn checks_follow_fixed_precedence() {
        let all_wrong = json!({
            "latitude": 100,
            "longitude": 200,
            "date": "yesterday",
            "units": "rankine",
            "response_format": "xml",
            "extra": true
        });
        let err = validate_arguments(&args(all_wrong.clone())).unwrap_err();
        assert_eq!(err, ValidationError::LatitudeOutOfRange);

        let mut next = args(all_wrong);
        next.insert("latitude".into(), json!(10));
        assert_eq!(validate_arguments(&next).unwrap_err(), ValidationError::LongitudeOutOfRange);

        next.insert("longitude".into(), json!(10));
        assert_eq!(validate_arguments(&next).unwrap_err(), ValidationError::InvalidDate);

        next.insert("date".into(), json!("2024-01-01"));
        assert_eq!(validate_arguments(&next).unwrap_err(), ValidationError::InvalidUnits);

        next.insert("units".into(), json!("kelvin"));
        assert_eq!(validate_arguments(&next).unwrap_err(), ValidationError::InvalidResponseFormat);

        next.insert("response_format".into(), json!("json"));
        assert_eq!(
            validate_arguments(&next).unwrap_err(),
            ValidationError::UnknownField("extra".into())
        );
    }

    #[test]
    fn null_options_are_not_treated_as_absent() {
        let err = validate_arguments(&args(json!({
            "latitude": 0, "longitude": 0, "date": "2024-01-01", "units": null
        })))
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidUnits);
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        assert_eq!(validate_value(&json!([1, 2])).unwrap_err(), ValidationError::NotAnObject);
    }
}
