use super::situation_lookup::{LookupState, SituationService};
use super::weather_sync::WeatherService;
use crate::error::HavaError;
use crate::models::CategorizedWeather;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Monotonic ids for refresh requests.
///
/// Every refresh takes a new generation when it starts. A result is applied
/// only if its generation is still the latest, so a slow response can never
/// overwrite a newer one.
#[derive(Debug, Default)]
pub struct RequestGenerations {
    latest: u64,
}

impl RequestGenerations {
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

#[derive(Debug)]
pub enum RefreshOutcome {
    /// Location or weather failed; no lookup was attempted.
    WeatherFailed { generation: u64, error: HavaError },
    Completed {
        generation: u64,
        weather: CategorizedWeather,
        lookup: LookupState,
    },
}

impl RefreshOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            RefreshOutcome::WeatherFailed { generation, .. } => *generation,
            RefreshOutcome::Completed { generation, .. } => *generation,
        }
    }
}

/// Full refresh: location → weather → categorize → candidates → match.
pub async fn full_refresh(
    weather_service: &WeatherService,
    situations: &SituationService,
    generation: u64,
) -> RefreshOutcome {
    let weather = match weather_service.fetch().await {
        Ok(w) => w,
        Err(error) => return RefreshOutcome::WeatherFailed { generation, error },
    };
    repick(situations, weather, generation).await
}

/// Re-run only the lookup for an observation already on screen.
pub async fn repick(
    situations: &SituationService,
    weather: CategorizedWeather,
    generation: u64,
) -> RefreshOutcome {
    let mut rng = StdRng::from_os_rng();
    let lookup = situations.lookup(&weather, &mut rng).await;
    RefreshOutcome::Completed {
        generation,
        weather,
        lookup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::logic::weather_sync::fakes::*;
    use crate::models::{SituationDraft, WeatherCondition};
    use std::sync::Arc;

    #[test]
    fn only_latest_generation_is_current() {
        let mut generations = RequestGenerations::default();
        let first = generations.begin();
        let second = generations.begin();

        assert!(second > first);
        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
        assert_eq!(generations.latest(), second);
    }

    #[tokio::test]
    async fn full_refresh_finds_situation() {
        let db = Database::open_in_memory().unwrap();
        db.insert_situation(&SituationDraft::new("باران").with_weather(WeatherCondition::Rainy))
            .unwrap();

        let weather_service = WeatherService::new(
            Arc::new(FixedLocation(Some(tehran()))),
            Arc::new(FixedWeather::new(Some(rainy_evening()))),
        );
        let situations = SituationService::new(Arc::new(db), 20);

        let outcome = full_refresh(&weather_service, &situations, 7).await;
        assert_eq!(outcome.generation(), 7);
        match outcome {
            RefreshOutcome::Completed { weather, lookup, .. } => {
                assert_eq!(weather.weather, WeatherCondition::Rainy);
                assert_eq!(lookup.situation().unwrap().sentence_fa, "باران");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn permission_denied_stops_refresh() {
        let db = Database::open_in_memory().unwrap();
        let weather_service = WeatherService::new(
            Arc::new(FixedLocation(None)),
            Arc::new(FixedWeather::new(Some(rainy_evening()))),
        );
        let situations = SituationService::new(Arc::new(db), 20);

        let outcome = full_refresh(&weather_service, &situations, 3).await;
        assert!(matches!(
            outcome,
            RefreshOutcome::WeatherFailed {
                generation: 3,
                error: HavaError::PermissionDenied(_)
            }
        ));
    }
}
