//! HTTP client for the weatherapi.com `current.json` endpoint.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::instrument;

use crate::types::{ApiErrorBody, CurrentResponse, WeatherError, WeatherInfo, WeatherSnapshot};

pub const DEFAULT_ENDPOINT: &str = "https://api.weatherapi.com/v1/current.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "SkyTodo/0.1.0";

/// Fetches current weather for a city.
///
/// One request per call; no caching and no cancellation of earlier calls.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    endpoint: String,
    api_key: Option<String>,
}

impl WeatherProvider {
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            endpoint: endpoint.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the current weather for `city`.
    ///
    /// # Errors
    /// Fails on a blank city, a missing API key, transport errors, non-2xx
    /// statuses, and bodies missing any of the expected fields.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, city: &str) -> Result<WeatherInfo, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::InvalidCity);
        }
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", api_key), ("q", city), ("aqi", "no")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let parsed: CurrentResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        let info = WeatherInfo::from(parsed);

        tracing::info!("Fetched weather for {}: {}°C {}", info.city, info.temperature, info.condition);
        Ok(info)
    }

    /// Fetch, substituting the placeholder on failure.
    ///
    /// The returned snapshot always has displayable info; `error` holds the
    /// failure message when the placeholder was used, as `"{prefix}: {error}"`
    /// if a prefix is given.
    pub async fn fetch_or_placeholder(&self, city: &str, prefix: Option<&str>) -> WeatherSnapshot {
        match self.fetch(city).await {
            Ok(info) => WeatherSnapshot::fetched(info),
            Err(e) => {
                tracing::warn!("Weather fetch for {} failed: {}", city, e);
                let message = match prefix {
                    Some(prefix) => format!("{prefix}: {e}"),
                    None => e.to_string(),
                };
                WeatherSnapshot::fallback(city, message)
            }
        }
    }
}

fn api_error(status: StatusCode, body: &str) -> WeatherError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string()
        });
    WeatherError::Api {
        status: status.as_u16(),
        message,
    }
}
