use super::{Position, WeatherProvider};
use crate::config::OpenWeatherMapConfig;
use crate::error::{HavaError, Result};
use crate::models::RawWeather;
use async_trait::async_trait;
use serde::Deserialize;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
    base_url: String,
}

// OpenWeatherMap current weather response
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    #[serde(default)]
    weather: Vec<OwmWeather>,
    main: OwmMain,
    #[serde(default)]
    wind: OwmWind,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    id: u32,
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: f64, // m/s with units=metric
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url: API_BASE_URL.to_string(),
        }
    }

    fn current_url(&self, position: &Position) -> Result<reqwest::Url> {
        let mut params: Vec<(&str, String)> = match position {
            Position::Coordinates {
                latitude,
                longitude,
            } => vec![("lat", latitude.to_string()), ("lon", longitude.to_string())],
            Position::City(name) => vec![("q", name.clone())],
        };
        params.push(("appid", self.config.api_key.clone()));
        params.push(("units", "metric".to_string()));
        params.push(("lang", self.config.lang.clone()));

        reqwest::Url::parse_with_params(&format!("{}/weather", self.base_url), &params)
            .map_err(|e| HavaError::Config(format!("Invalid OpenWeatherMap URL: {}", e)))
    }

    /// Fetch current conditions from OpenWeatherMap
    pub async fn fetch_current(&self, position: &Position) -> Result<RawWeather> {
        let url = self.current_url(position)?;

        let response =
            self.client.get(url).send().await.map_err(|e| {
                HavaError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HavaError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmCurrentResponse = response.json().await.map_err(|e| {
            HavaError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        Ok(convert_response(owm_response))
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self, position: &Position) -> Result<bool> {
        let url = self.current_url(position)?;

        let response =
            self.client.get(url).send().await.map_err(|e| {
                HavaError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

fn convert_response(response: OwmCurrentResponse) -> RawWeather {
    let first = response.weather.first();

    RawWeather {
        temp_celsius: response.main.temp,
        humidity_percent: response.main.humidity,
        wind_speed_ms: response.wind.speed,
        condition_code: first.map(|w| w.id),
        summary: first.map(|w| w.main.clone()).unwrap_or_default(),
        description: first.map(|w| w.description.clone()).unwrap_or_default(),
        location_name: response.name,
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapClient {
    async fn current(&self, position: &Position) -> Result<RawWeather> {
        let raw = self.fetch_current(position).await?;
        tracing::debug!(
            location = %raw.location_name,
            temp = raw.temp_celsius,
            code = ?raw.condition_code,
            "Fetched current weather"
        );
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> OpenWeatherMapConfig {
        OpenWeatherMapConfig {
            api_key: "test_key".to_string(),
            lang: "fa".to_string(),
        }
    }

    #[test]
    fn url_for_coordinates() {
        let client = OpenWeatherMapClient::new(sample_config());
        let url = client
            .current_url(&Position::Coordinates {
                latitude: 35.7,
                longitude: 51.4,
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.openweathermap.org/data/2.5/weather?lat=35.7&lon=51.4&appid=test_key&units=metric&lang=fa"
        );
    }

    #[test]
    fn url_for_city_is_encoded() {
        let client = OpenWeatherMapClient::new(sample_config());
        let url = client
            .current_url(&Position::City("Bandar Abbas".into()))
            .unwrap();
        assert!(url.as_str().contains("q=Bandar+Abbas"));
        assert!(url.as_str().contains("units=metric"));
    }

    #[test]
    fn convert_full_response() {
        let json = r#"{
            "weather": [{"id": 501, "main": "Rain", "description": "باران متوسط"}],
            "main": {"temp": 12.6, "humidity": 81},
            "wind": {"speed": 4.1},
            "name": "Rasht"
        }"#;
        let response: OwmCurrentResponse = serde_json::from_str(json).unwrap();
        let raw = convert_response(response);

        assert_eq!(raw.condition_code, Some(501));
        assert_eq!(raw.summary, "Rain");
        assert_eq!(raw.location_name, "Rasht");
        assert_eq!(raw.humidity_percent, 81.0);
        assert_eq!(raw.wind_speed_ms, 4.1);
    }

    #[test]
    fn convert_response_without_conditions() {
        let json = r#"{"weather": [], "main": {"temp": 20.0, "humidity": 40}}"#;
        let response: OwmCurrentResponse = serde_json::from_str(json).unwrap();
        let raw = convert_response(response);

        assert_eq!(raw.condition_code, None);
        assert_eq!(raw.wind_speed_ms, 0.0);
        assert!(raw.location_name.is_empty());
    }
}
