pub mod location;
pub mod openweathermap;
pub mod spotify;

pub use location::ConfiguredLocation;
pub use openweathermap::OpenWeatherMapClient;
pub use spotify::SpotifyClient;

use crate::error::Result;
use crate::models::RawWeather;
use async_trait::async_trait;

/// Where to ask the weather provider about.
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    Coordinates { latitude: f64, longitude: f64 },
    City(String),
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{:.4},{:.4}", latitude, longitude),
            Position::City(name) => write!(f, "{}", name),
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolve the current position, or `PermissionDenied` when the user
    /// has not allowed location access.
    async fn position(&self) -> Result<Position>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, position: &Position) -> Result<RawWeather>;
}
