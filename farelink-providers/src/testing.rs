//! Pluggable fault and latency injection for tests. Production fetch
//! logic never sleeps or fails on purpose; these sources do.

use crate::source::{RawSource, SourceError};
use async_trait::async_trait;
use std::time::Duration;

/// Serves a fixed payload, optionally after a delay or as a failure.
pub struct StaticSource {
    payload: String,
    delay: Option<Duration>,
    failure: Option<String>,
}

impl StaticSource {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            delay: None,
            failure: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            payload: String::new(),
            delay: None,
            failure: Some(message.into()),
        }
    }
}

#[async_trait]
impl RawSource for StaticSource {
    async fn fetch_payload(&self) -> Result<String, SourceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(SourceError::Unavailable(message.clone()));
        }
        Ok(self.payload.clone())
    }
}

/// Fails a configurable fraction of calls, for soak-style tests.
pub struct FlakySource {
    payload: String,
    failure_rate: f64,
}

impl FlakySource {
    pub fn new(payload: impl Into<String>, failure_rate: f64) -> Self {
        Self {
            payload: payload.into(),
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl RawSource for FlakySource {
    async fn fetch_payload(&self) -> Result<String, SourceError> {
        use rand::Rng;
        if rand::thread_rng().gen_bool(self.failure_rate) {
            return Err(SourceError::Unavailable("injected failure".to_string()));
        }
        Ok(self.payload.clone())
    }
}
