//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::WeatherError;
use crate::provider::{Upstream, UpstreamQuery, UpstreamReply};

#[derive(Debug, Clone)]
enum Behavior {
    Reply(UpstreamReply),
    Fail(String),
    Panic,
}

/// Upstream that records every query and answers with a canned outcome.
#[derive(Debug, Clone)]
pub struct FakeUpstream {
    behavior: Behavior,
    queries: Arc<Mutex<Vec<UpstreamQuery>>>,
}

impl FakeUpstream {
    fn with(behavior: Behavior) -> Self {
        Self { behavior, queries: Arc::default() }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::reply(200, body)
    }

    pub fn reply(status: u16, body: impl Into<String>) -> Self {
        Self::with(Behavior::Reply(UpstreamReply { status, body: body.into() }))
    }

    pub fn failing(message: &str) -> Self {
        Self::with(Behavior::Fail(message.to_string()))
    }

    pub fn panicking() -> Self {
        Self::with(Behavior::Panic)
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().expect("queries lock").len()
    }

    pub fn queries(&self) -> Vec<UpstreamQuery> {
        self.queries.lock().expect("queries lock").clone()
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn get(&self, query: &UpstreamQuery) -> Result<UpstreamReply, WeatherError> {
        self.queries.lock().expect("queries lock").push(query.clone());

        match &self.behavior {
            Behavior::Reply(reply) => Ok(reply.clone()),
            Behavior::Fail(message) => Err(WeatherError::Transport(message.clone())),
            Behavior::Panic => panic!("upstream exploded"),
        }
    }
}

/// Day summary with every field the client reads.
pub fn full_payload() -> &'static str {
    r#"{
        "lat": 48.8566,
        "lon": 2.3522,
        "tz": "+01:00",
        "timezone": "+01:00",
        "date": "2024-01-01",
        "units": "metric",
        "cloud_cover": {"afternoon": 75},
        "humidity": {"afternoon": 81},
        "precipitation": {"total": 2.4},
        "temperature": {
            "min": 1.5,
            "max": 7.25,
            "afternoon": 6.8,
            "night": 3.2,
            "evening": 5.1,
            "morning": 2.0
        },
        "pressure": {"afternoon": 1014},
        "wind": {"max": {"speed": 6.7, "direction": 240}}
    }"#
}

/// Same as [`full_payload`] without a timezone.
pub fn payload_without_timezone() -> String {
    full_payload().replace(r#""timezone": "+01:00","#, "")
}
