use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("weather provider could not be reached: {message}")]
    Unavailable { message: String },
    #[error("weather provider responded with status {status}")]
    FetchFailed { status: StatusCode },
    #[error("weather provider returned a body that is not JSON: {message}")]
    InvalidPayload { message: String },
}

/// Source of current weather conditions for a free-text location.
///
/// The returned payload belongs to the provider and is handed back untouched.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &str) -> Result<Value, ProviderError>;
}

/// Client for the WeatherStack `current` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherStackProvider {
    http: Client,
    endpoint: String,
    api_key: String,
    units: String,
}

impl WeatherStackProvider {
    pub fn new(
        base_url: &str,
        api_key: String,
        units: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ProviderError::Unavailable {
                message: format!("could not build http client: {err}"),
            })?;
        Ok(WeatherStackProvider {
            http,
            endpoint: format!("{}/current", base_url.trim_end_matches('/')),
            api_key,
            units,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(
            config.upstream_base_url.as_str(),
            config.api_key.clone(),
            config.units.clone(),
            config.request_timeout,
        )
    }
}

#[async_trait]
impl WeatherProvider for WeatherStackProvider {
    async fn current(&self, location: &str) -> Result<Value, ProviderError> {
        debug!("Requesting current weather for {location:?}");
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("query", location),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(|err| ProviderError::Unavailable {
                message: err.without_url().to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::FetchFailed { status });
        }

        // The timeout covers the body as well, so a stalled body is still an outage.
        let body = response
            .bytes()
            .await
            .map_err(|err| ProviderError::Unavailable {
                message: err.without_url().to_string(),
            })?;
        serde_json::from_slice(&body).map_err(|err| ProviderError::InvalidPayload {
            message: err.to_string(),
        })
    }
}
