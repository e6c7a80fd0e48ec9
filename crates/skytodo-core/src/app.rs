use std::sync::Arc;
use std::time::Duration;

use skytodo_todo::{SqliteKvStore, TodoStore};
use skytodo_weather::{WeatherProvider, WeatherSnapshot};

use crate::error::{AppError, ConfigError};
use crate::Config;

/// Application state owned by the presentation layer.
///
/// Holds the to-do store, the selected city and the weather snapshot on
/// display. All mutation goes through `&mut self`.
pub struct App {
    config: Arc<Config>,
    todos: TodoStore,
    provider: WeatherProvider,
    selected_city: String,
    snapshot: WeatherSnapshot,
}

impl App {
    /// Open the to-do database under the config directory and build the
    /// weather provider.
    ///
    /// # Errors
    /// Fails if the database cannot be opened, the persisted list is
    /// malformed, or the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.config_dir)?;

        let backend = SqliteKvStore::new(config.database_path())?;
        let todos = TodoStore::open(Box::new(backend), config.storage.todo_slot.clone())?;
        let provider = WeatherProvider::new(
            &config.weather.endpoint,
            config.weather.api_key.clone(),
            Duration::from_secs(config.weather.timeout_secs),
        )?;

        Ok(Self::with_parts(config, todos, provider))
    }

    /// Assemble from already-built parts.
    pub fn with_parts(config: Config, todos: TodoStore, provider: WeatherProvider) -> Self {
        let selected_city = config.weather.default_city.clone();
        Self {
            config: Arc::new(config),
            todos,
            provider,
            selected_city,
            snapshot: WeatherSnapshot::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn selected_city(&self) -> &str {
        &self.selected_city
    }

    /// Weather currently on display.
    pub fn weather(&self) -> &WeatherSnapshot {
        &self.snapshot
    }

    pub fn todos(&self) -> &TodoStore {
        &self.todos
    }

    pub fn todos_mut(&mut self) -> &mut TodoStore {
        &mut self.todos
    }

    /// Fetch weather for the selected city, showing the placeholder on
    /// failure.
    pub async fn load_weather(&mut self) -> &WeatherSnapshot {
        self.snapshot = self
            .provider
            .fetch_or_placeholder(&self.selected_city, Some("网络错误"))
            .await;
        &self.snapshot
    }

    /// Switch city and load its weather.
    ///
    /// # Errors
    /// Returns `ConfigError::UnknownCity` if `city` is not configured; the
    /// selection is left unchanged.
    pub async fn select_city(&mut self, city: &str) -> Result<&WeatherSnapshot, AppError> {
        if !self.config.weather.has_city(city) {
            return Err(ConfigError::UnknownCity(city.to_string()).into());
        }
        tracing::info!("Selected city: {}", city);
        self.selected_city = city.to_string();
        Ok(self.load_weather().await)
    }

    /// Re-fetch the selected city. On failure the current info stays and
    /// only the error changes.
    pub async fn refresh_weather(&mut self) -> &WeatherSnapshot {
        match self.provider.fetch(&self.selected_city).await {
            Ok(info) => self.snapshot = WeatherSnapshot::fetched(info),
            Err(e) => {
                tracing::warn!("Weather refresh for {} failed: {}", self.selected_city, e);
                self.snapshot.error = Some(format!("刷新失败: {e}"));
            }
        }
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use skytodo_todo::TODO_SLOT;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn weather_body(name: &str, condition: &str) -> serde_json::Value {
        serde_json::json!({
            "location": { "name": name },
            "current": {
                "temp_c": 12.3,
                "feelslike_c": 10.9,
                "humidity": 40,
                "wind_kph": 22.1,
                "condition": { "text": condition, "icon": "//cdn/113.png" }
            }
        })
    }

    fn test_app(server: &MockServer) -> App {
        let mut config = Config::default();
        config.weather.endpoint = format!("{}/v1/current.json", server.uri());
        config.weather.api_key = Some("test-key".to_string());

        let backend = SqliteKvStore::in_memory().unwrap();
        let todos = TodoStore::open(Box::new(backend), TODO_SLOT).unwrap();
        let provider = WeatherProvider::new(
            &config.weather.endpoint,
            config.weather.api_key.clone(),
            Duration::from_secs(5),
        )
        .unwrap();
        App::with_parts(config, todos, provider)
    }

    #[tokio::test]
    async fn test_initial_state() {
        let server = MockServer::start().await;
        let app = test_app(&server);

        assert_eq!(app.selected_city(), "深圳");
        assert_eq!(app.weather().info.city, "未知");
        assert!(app.todos().items().is_empty());
    }

    #[tokio::test]
    async fn test_select_city_fetches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("q", "北京"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Beijing", "Sunny")))
            .mount(&server)
            .await;

        let mut app = test_app(&server);
        let snapshot = app.select_city("北京").await.unwrap().clone();

        assert_eq!(app.selected_city(), "北京");
        assert_eq!(snapshot.info.city, "Beijing");
        assert_eq!(snapshot.info.temperature, "12");
        assert_eq!(snapshot.info.display_condition(), "晴天");
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_select_unknown_city() {
        let server = MockServer::start().await;
        let mut app = test_app(&server);

        let result = app.select_city("Tokyo").await;
        assert!(matches!(result, Err(AppError::Config(ConfigError::UnknownCity(_)))));
        assert_eq!(app.selected_city(), "深圳");
    }

    #[tokio::test]
    async fn test_load_failure_shows_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = test_app(&server);
        let snapshot = app.select_city("杭州").await.unwrap();

        assert_eq!(snapshot.info.city, "杭州");
        assert_eq!(snapshot.info.temperature, "28");
        assert_eq!(snapshot.info.condition, "Partly cloudy");
        assert!(snapshot.error.as_deref().unwrap().starts_with("网络错误: "));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Shenzhen", "Light rain")))
            .mount(&server)
            .await;

        let mut app = test_app(&server);
        app.load_weather().await;
        assert_eq!(app.weather().info.city, "Shenzhen");

        server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let snapshot = app.refresh_weather().await;
        assert_eq!(snapshot.info.city, "Shenzhen");
        assert_eq!(snapshot.info.condition, "Light rain");
        assert!(snapshot.error.as_deref().unwrap().starts_with("刷新失败: "));
    }

    #[tokio::test]
    async fn test_refresh_success_clears_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut app = test_app(&server);
        app.load_weather().await;
        assert!(app.weather().is_fallback());

        server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Shenzhen", "Fog")))
            .mount(&server)
            .await;

        let snapshot = app.refresh_weather().await;
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.info.display_condition(), "大雾");
    }

    #[tokio::test]
    async fn test_todo_operations_through_app() {
        let server = MockServer::start().await;
        let mut app = test_app(&server);

        let item = app.todos_mut().add("Pack umbrella", None).unwrap().unwrap();
        assert!(app.todos_mut().toggle(&item.id).unwrap());
        assert!(app.todos().get(&item.id).unwrap().is_completed);
    }

    #[tokio::test]
    async fn test_new_opens_database_in_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.config_dir = dir.path().join("skytodo");

        {
            let mut app = App::new(config.clone()).unwrap();
            app.todos_mut().add("persisted", None).unwrap();
        }

        let app = App::new(config).unwrap();
        assert_eq!(app.todos().items().len(), 1);
        assert_eq!(app.todos().items()[0].text, "persisted");
    }
}
