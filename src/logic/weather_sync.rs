use super::categorizer;
use crate::datasources::{LocationProvider, WeatherProvider};
use crate::error::{HavaError, Result};
use crate::models::CategorizedWeather;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Location → weather provider → categorizer.
pub struct WeatherService {
    location: Arc<dyn LocationProvider>,
    provider: Arc<dyn WeatherProvider>,
    current: Arc<RwLock<Option<CategorizedWeather>>>,
}

impl WeatherService {
    pub fn new(location: Arc<dyn LocationProvider>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            location,
            provider,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Fetch and categorize current weather, bucketing time of day from the
    /// local clock.
    pub async fn fetch(&self) -> Result<CategorizedWeather> {
        self.fetch_with(categorizer::categorize).await
    }

    /// Same as `fetch` with an explicit local hour.
    pub async fn fetch_at(&self, hour: u32) -> Result<CategorizedWeather> {
        self.fetch_with(|raw| categorizer::categorize_at(raw, hour))
            .await
    }

    async fn fetch_with<F>(&self, categorize: F) -> Result<CategorizedWeather>
    where
        F: FnOnce(&crate::models::RawWeather) -> CategorizedWeather,
    {
        let position = self.location.position().await.map_err(|e| {
            match &e {
                HavaError::PermissionDenied(_) => tracing::info!("Location access denied: {}", e),
                _ => tracing::warn!("Failed to resolve location: {}", e),
            }
            e
        })?;

        let raw = self.provider.current(&position).await.map_err(|e| {
            tracing::warn!(%position, "Failed to fetch weather: {}", e);
            e
        })?;

        let weather = categorize(&raw);
        tracing::debug!(
            city = %weather.city,
            weather = %weather.weather,
            temperature = %weather.temperature,
            humidity = %weather.humidity,
            wind = %weather.wind,
            time_of_day = %weather.time_of_day,
            "Categorized weather"
        );

        let mut current = self.current.write().await;
        *current = Some(weather.clone());

        Ok(weather)
    }

    /// The last successfully categorized observation, if any.
    pub async fn current(&self) -> Option<CategorizedWeather> {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use crate::datasources::{LocationProvider, Position, WeatherProvider};
    use crate::error::{HavaError, Result};
    use crate::models::RawWeather;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct FixedLocation(pub Option<Position>);

    #[async_trait]
    impl LocationProvider for FixedLocation {
        async fn position(&self) -> Result<Position> {
            self.0
                .clone()
                .ok_or_else(|| HavaError::PermissionDenied("denied in test".into()))
        }
    }

    pub struct FixedWeather {
        pub raw: Option<RawWeather>,
        pub calls: AtomicUsize,
    }

    impl FixedWeather {
        pub fn new(raw: Option<RawWeather>) -> Self {
            Self {
                raw,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for FixedWeather {
        async fn current(&self, _position: &Position) -> Result<RawWeather> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.raw
                .clone()
                .ok_or_else(|| HavaError::DataSourceUnavailable("offline in test".into()))
        }
    }

    pub fn tehran() -> Position {
        Position::City("Tehran".into())
    }

    pub fn rainy_evening() -> RawWeather {
        RawWeather {
            temp_celsius: 14.4,
            humidity_percent: 75.0,
            wind_speed_ms: 8.33,
            condition_code: Some(501),
            summary: "Rain".into(),
            description: "باران".into(),
            location_name: "Tehran".into(),
        }
    }
}
