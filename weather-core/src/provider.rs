use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::WeatherError,
    model::Units,
    provider::{http::HttpUpstream, openweather::OpenWeatherClient},
};

pub mod http;
pub mod openweather;

/// Query parameters of one day-summary lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub date: String,
    pub units: Units,
    pub api_key: String,
}

impl UpstreamQuery {
    /// Pairs in the order they are sent on the wire.
    pub fn params(&self) -> [(&'static str, String); 5] {
        [
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
            ("date", self.date.clone()),
            ("appid", self.api_key.clone()),
            ("units", self.units.as_str().to_string()),
        ]
    }
}

/// Raw status and body as the provider sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One outbound GET to the weather provider.
///
/// Implementations return `Err` only when no HTTP response was obtained;
/// any status code, successful or not, comes back as a reply.
#[async_trait]
pub trait Upstream: Send + Sync + Debug {
    async fn get(&self, query: &UpstreamQuery) -> Result<UpstreamReply, WeatherError>;
}

/// Construct the OpenWeather client from config, talking HTTP to `base_url`.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let upstream = HttpUpstream::new(&config.base_url, config.timeout())?;
    Ok(OpenWeatherClient::new(
        config.api_key().map(str::to_owned),
        Box::new(upstream),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_carry_key_and_units() {
        let query = UpstreamQuery {
            latitude: 48.8566,
            longitude: 2.3522,
            date: "2024-01-01".into(),
            units: Units::Imperial,
            api_key: "KEY".into(),
        };

        let params = query.params();
        assert_eq!(params[0], ("lat", "48.8566".to_string()));
        assert_eq!(params[1], ("lon", "2.3522".to_string()));
        assert_eq!(params[2], ("date", "2024-01-01".to_string()));
        assert_eq!(params[3], ("appid", "KEY".to_string()));
        assert_eq!(params[4], ("units", "imperial".to_string()));
    }

    #[test]
    fn success_range_is_2xx() {
        let reply = |status| UpstreamReply { status, body: String::new() };
        assert!(reply(200).is_success());
        assert!(reply(204).is_success());
        assert!(!reply(301).is_success());
        assert!(!reply(429).is_success());
    }

    #[test]
    fn client_from_config_without_key_still_builds() {
        let cfg = Config::default();
        let client = client_from_config(&cfg).expect("client should build");
        assert!(!client.has_api_key());
    }
}
