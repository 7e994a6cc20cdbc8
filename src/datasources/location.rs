use super::{LocationProvider, Position};
use crate::config::LocationConfig;
use crate::error::{HavaError, Result};
use async_trait::async_trait;

/// Location taken from the config file instead of a device sensor.
pub struct ConfiguredLocation {
    config: LocationConfig,
}

impl ConfiguredLocation {
    pub fn new(config: LocationConfig) -> Self {
        Self { config }
    }

    fn resolve(&self) -> Result<Position> {
        if !self.config.share_location {
            return Err(HavaError::PermissionDenied(
                "location sharing is turned off (location.share_location)".into(),
            ));
        }

        match (self.config.latitude, self.config.longitude) {
            (Some(latitude), Some(longitude)) => {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude)
                {
                    return Err(HavaError::Config(format!(
                        "coordinates out of range: {}, {}",
                        latitude, longitude
                    )));
                }
                Ok(Position::Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => match self.config.city.as_deref().map(str::trim) {
                Some(city) if !city.is_empty() => Ok(Position::City(city.to_string())),
                _ => Err(HavaError::Config(
                    "location needs latitude and longitude, or a city".into(),
                )),
            },
        }
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn position(&self) -> Result<Position> {
        let position = self.resolve()?;
        tracing::debug!(%position, "Resolved location");
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LocationConfig {
        LocationConfig {
            share_location: true,
            latitude: Some(35.6892),
            longitude: Some(51.3890),
            city: None,
        }
    }

    #[test]
    fn test_coordinates_preferred() {
        let location = ConfiguredLocation::new(LocationConfig {
            city: Some("Shiraz".into()),
            ..config()
        });
        assert_eq!(
            location.resolve().unwrap(),
            Position::Coordinates {
                latitude: 35.6892,
                longitude: 51.3890
            }
        );
    }

    #[test]
    fn test_city_fallback() {
        let location = ConfiguredLocation::new(LocationConfig {
            latitude: None,
            longitude: None,
            city: Some("  Isfahan ".into()),
            ..config()
        });
        assert_eq!(
            location.resolve().unwrap(),
            Position::City("Isfahan".into())
        );
    }

    #[tokio::test]
    async fn test_sharing_disabled_is_permission_denied() {
        let location = ConfiguredLocation::new(LocationConfig {
            share_location: false,
            ..config()
        });
        assert!(matches!(
            location.position().await,
            Err(HavaError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_missing_location_is_config_error() {
        let location = ConfiguredLocation::new(LocationConfig {
            latitude: Some(10.0),
            longitude: None,
            city: Some("   ".into()),
            ..config()
        });
        assert!(matches!(location.resolve(), Err(HavaError::Config(_))));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let location = ConfiguredLocation::new(LocationConfig {
            latitude: Some(120.0),
            ..config()
        });
        assert!(matches!(location.resolve(), Err(HavaError::Config(_))));
    }
}
