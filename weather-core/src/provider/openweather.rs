use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::WeatherError,
    model::{
        AfternoonReading, Location, Precipitation, Reading, Temperature, Units, WeatherReport,
        WeatherRequest, WeatherResult, Wind, WindReading,
    },
    validate::{check_date, check_latitude, check_longitude},
};

use super::{Upstream, UpstreamQuery, UpstreamReply};

/// Timezone reported when the provider omits one.
pub const DEFAULT_TIMEZONE: &str = "+00:00";

/// Client for the OpenWeather One Call day summary.
///
/// Every failure is returned as a [`WeatherError`] value; nothing here panics
/// or propagates past [`OpenWeatherClient::fetch_weather`].
#[derive(Debug)]
pub struct OpenWeatherClient {
    api_key: Option<String>,
    upstream: Box<dyn Upstream>,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>, upstream: Box<dyn Upstream>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Self { api_key, upstream }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn fetch(&self, request: &WeatherRequest) -> WeatherResult {
        self.fetch_weather(request.latitude(), request.longitude(), request.date(), request.units())
            .await
    }

    /// Look up the day summary for one location and date.
    ///
    /// The key check comes first and short-circuits; coordinates and date
    /// are then re-checked with the validator's own functions before the
    /// single outbound call.
    pub async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
        date: &str,
        units: Units,
    ) -> WeatherResult {
        let api_key = self.api_key.as_ref().ok_or(WeatherError::MissingApiKey)?;

        check_latitude(latitude)?;
        check_longitude(longitude)?;
        check_date(date)?;

        let query = UpstreamQuery {
            latitude,
            longitude,
            date: date.to_string(),
            units,
            api_key: api_key.clone(),
        };

        let reply = self.upstream.get(&query).await.inspect_err(|e| {
            tracing::warn!(error = %e, "weather provider unreachable");
        })?;

        if !reply.is_success() {
            let err = WeatherError::provider(reply.status, provider_message(&reply));
            tracing::warn!(
                status = reply.status,
                error = %err,
                "weather provider rejected request"
            );
            return Err(err);
        }

        tracing::debug!(
            status = reply.status,
            bytes = reply.body.len(),
            "weather provider replied"
        );

        normalize(&reply.body, latitude, longitude, date, units)
            .map_err(|e| WeatherError::Normalization(e.to_string()))
    }
}

/// `message` from an error body, if the body is JSON and carries a non-empty one.
fn provider_message(reply: &UpstreamReply) -> Option<String> {
    let body: Value = serde_json::from_str(&reply.body).ok()?;
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

#[derive(Debug, Default, Deserialize)]
struct DaySummary {
    timezone: Option<String>,
    temperature: Option<RawTemperature>,
    humidity: Option<RawAfternoon>,
    pressure: Option<RawAfternoon>,
    cloud_cover: Option<RawAfternoon>,
    precipitation: Option<RawPrecipitation>,
    wind: Option<RawWind>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTemperature {
    min: Option<f64>,
    max: Option<f64>,
    morning: Option<f64>,
    afternoon: Option<f64>,
    evening: Option<f64>,
    night: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAfternoon {
    afternoon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPrecipitation {
    total: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWind {
    max: Option<RawWindMax>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWindMax {
    speed: Option<f64>,
    direction: Option<f64>,
}

/// Map a day-summary body onto the canonical report.
///
/// Missing numbers become `0` and a missing timezone becomes `+00:00`, so a
/// successful report always carries every block. An empty body is read as an
/// empty summary.
fn normalize(
    body: &str,
    latitude: f64,
    longitude: f64,
    date: &str,
    units: Units,
) -> Result<WeatherReport, serde_json::Error> {
    let raw: DaySummary =
        if body.trim().is_empty() { DaySummary::default() } else { serde_json::from_str(body)? };

    let temp_unit = units.temperature_unit();
    let t = raw.temperature.unwrap_or_default();
    let reading = |value: Option<f64>| Reading::new(value.unwrap_or(0.0), temp_unit);

    let afternoon = |block: Option<RawAfternoon>, unit: &str| AfternoonReading {
        afternoon: block.and_then(|b| b.afternoon).unwrap_or(0.0),
        unit: unit.to_string(),
    };

    let wind_max = raw.wind.and_then(|w| w.max).unwrap_or_default();

    Ok(WeatherReport {
        location: Location {
            latitude,
            longitude,
            timezone: raw
                .timezone
                .filter(|tz| !tz.is_empty())
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        },
        date: date.to_string(),
        units,
        temperature: Some(Temperature {
            min: reading(t.min),
            max: reading(t.max),
            morning: reading(t.morning),
            afternoon: reading(t.afternoon),
            evening: reading(t.evening),
            night: reading(t.night),
        }),
        humidity: Some(afternoon(raw.humidity, "%")),
        pressure: Some(afternoon(raw.pressure, "hPa")),
        cloud_cover: Some(afternoon(raw.cloud_cover, "%")),
        precipitation: Some(Precipitation {
            total: raw.precipitation.and_then(|p| p.total).unwrap_or(0.0),
            unit: "mm".to_string(),
        }),
        wind: Some(Wind {
            max: WindReading {
                speed: wind_max.speed.unwrap_or(0.0),
                direction: wind_max.direction.unwrap_or(0.0),
                speed_unit: units.speed_unit().to_string(),
                direction_unit: "degrees".to_string(),
            },
        }),
    })
}
