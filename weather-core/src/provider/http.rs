use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::{error::Error as _, time::Duration};

use crate::error::WeatherError;

use super::{Upstream, UpstreamQuery, UpstreamReply};

/// [`Upstream`] over `reqwest` with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    base_url: String,
    http: Client,
}

impl HttpUpstream {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { base_url: base_url.to_string(), http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, query: &UpstreamQuery) -> Result<UpstreamReply, WeatherError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&query.params())
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(transport_error)?;

        Ok(UpstreamReply { status, body })
    }
}

/// The URL carries the API key, so it is stripped before the error is shown.
fn transport_error(err: reqwest::Error) -> WeatherError {
    let timed_out = err.is_timeout();
    let err = err.without_url();

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    if timed_out && !message.contains("timed out") {
        message.push_str(" (timed out)");
    }

    WeatherError::Transport(message)
}
