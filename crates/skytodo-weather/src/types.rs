use serde::{Deserialize, Serialize};

use crate::classify::{self, Gradient, WeatherIcon};

/// City shown before the first fetch completes.
pub const UNKNOWN_CITY: &str = "未知";

const UNKNOWN_VALUE: &str = "--";
const LOADING_CONDITION: &str = "加载中";

/// Normalized current-weather snapshot.
///
/// Every fetch produces a new value; nothing mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherInfo {
    pub city: String,
    /// Degrees Celsius, truncated toward zero.
    pub temperature: String,
    /// English condition phrase from the data source, e.g. "Partly cloudy".
    pub condition: String,
    /// Opaque icon reference from the data source.
    pub condition_icon: String,
    /// Relative humidity in percent.
    pub humidity: String,
    /// Wind speed in kph, truncated toward zero.
    pub wind_speed: String,
    /// Feels-like degrees Celsius, truncated toward zero.
    pub feels_like: String,
}

impl Default for WeatherInfo {
    fn default() -> Self {
        Self {
            city: UNKNOWN_CITY.to_string(),
            temperature: UNKNOWN_VALUE.to_string(),
            condition: LOADING_CONDITION.to_string(),
            condition_icon: String::new(),
            humidity: UNKNOWN_VALUE.to_string(),
            wind_speed: UNKNOWN_VALUE.to_string(),
            feels_like: UNKNOWN_VALUE.to_string(),
        }
    }
}

impl WeatherInfo {
    /// Static stand-in shown when a fetch for `city` fails.
    pub fn placeholder(city: &str) -> Self {
        Self {
            city: city.to_string(),
            temperature: "28".to_string(),
            condition: "Partly cloudy".to_string(),
            condition_icon: String::new(),
            humidity: "75".to_string(),
            wind_speed: "15".to_string(),
            feels_like: "30".to_string(),
        }
    }

    /// Chinese label for the condition text.
    pub fn display_condition(&self) -> String {
        classify::display_condition(&self.condition)
    }

    pub fn gradient(&self) -> Gradient {
        classify::gradient_for(&self.condition)
    }

    pub fn icon(&self) -> WeatherIcon {
        classify::icon_for(&self.condition)
    }
}

/// What the caller displays: always some weather, plus the last error if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherSnapshot {
    pub info: WeatherInfo,
    pub error: Option<String>,
}

impl WeatherSnapshot {
    pub fn fetched(info: WeatherInfo) -> Self {
        Self { info, error: None }
    }

    /// Placeholder for `city` carrying `message` for diagnostics.
    pub fn fallback(city: &str, message: impl Into<String>) -> Self {
        Self {
            info: WeatherInfo::placeholder(city),
            error: Some(message.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// `current.json` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    humidity: f64,
    wind_kph: f64,
    feelslike_c: f64,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    icon: String,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[allow(dead_code)]
    pub code: Option<i64>,
    pub message: String,
}

/// Truncate toward zero and render as an integer string.
fn truncated(value: f64) -> String {
    (value.trunc() as i64).to_string()
}

impl From<CurrentResponse> for WeatherInfo {
    fn from(resp: CurrentResponse) -> Self {
        let current = resp.current;
        Self {
            city: resp.location.name,
            temperature: truncated(current.temp_c),
            condition: current.condition.text,
            condition_icon: current.condition.icon,
            humidity: truncated(current.humidity),
            wind_speed: truncated(current.wind_kph),
            feels_like: truncated(current.feelslike_c),
        }
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("City name is empty")]
    InvalidCity,
    #[error("Weather API key is not configured")]
    MissingApiKey,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => "Unable to reach the weather service. Check your connection.",
            WeatherError::Api { status, .. } if *status >= 500 => {
                "Weather service unavailable. Please try again later."
            }
            WeatherError::Api { .. } => "Weather request was rejected. Check the city and settings.",
            WeatherError::Parse(_) => "Received unexpected weather data.",
            WeatherError::InvalidCity => "Please choose a city.",
            WeatherError::MissingApiKey => "Weather API key is missing. Check settings.",
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn response(temp: f64, wind: f64, feels: f64) -> CurrentResponse {
        serde_json::from_value(serde_json::json!({
            "location": { "name": "Shenzhen" },
            "current": {
                "temp_c": temp,
                "humidity": 81,
                "wind_kph": wind,
                "feelslike_c": feels,
                "condition": { "text": "Light rain", "icon": "//cdn.weatherapi.com/296.png" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_conversion_truncates_toward_zero() {
        let info = WeatherInfo::from(response(27.9, 15.8, -3.7));
        assert_eq!(info.city, "Shenzhen");
        assert_eq!(info.temperature, "27");
        assert_eq!(info.wind_speed, "15");
        assert_eq!(info.feels_like, "-3");
        assert_eq!(info.humidity, "81");
        assert_eq!(info.condition, "Light rain");
        assert_eq!(info.condition_icon, "//cdn.weatherapi.com/296.png");
    }

    #[test]
    fn test_small_negative_truncates_to_zero() {
        let info = WeatherInfo::from(response(-0.6, 0.4, -0.2));
        assert_eq!(info.temperature, "0");
        assert_eq!(info.wind_speed, "0");
        assert_eq!(info.feels_like, "0");
    }

    #[test]
    fn test_default_is_loading_sentinel() {
        let info = WeatherInfo::default();
        assert_eq!(info.city, UNKNOWN_CITY);
        assert_eq!(info.temperature, "--");
        assert_eq!(info.condition, "加载中");
    }

    #[test]
    fn test_placeholder_values() {
        let info = WeatherInfo::placeholder("北京");
        assert_eq!(info.city, "北京");
        assert_eq!(info.temperature, "28");
        assert_eq!(info.condition, "Partly cloudy");
        assert_eq!(info.humidity, "75");
        assert_eq!(info.wind_speed, "15");
        assert_eq!(info.feels_like, "30");
    }

    #[test]
    fn test_fallback_snapshot_keeps_message() {
        let snapshot = WeatherSnapshot::fallback("厦门", "timed out");
        assert!(snapshot.is_fallback());
        assert_eq!(snapshot.info.city, "厦门");
        assert_eq!(snapshot.error.as_deref(), Some("timed out"));
    }

    #[test]
    fn test_missing_field_fails_to_parse() {
        let result = serde_json::from_value::<CurrentResponse>(serde_json::json!({
            "location": { "name": "Shenzhen" },
            "current": { "temp_c": 20.0 }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_api_error_user_message() {
        let err = WeatherError::Api { status: 503, message: "down".into() };
        assert!(err.user_message().contains("unavailable"));
        let err = WeatherError::Api { status: 400, message: "No matching location found.".into() };
        assert!(err.to_string().contains("No matching location"));
    }
}
