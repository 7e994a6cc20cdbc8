use super::filter::CandidateFilter;
use super::matcher;
use crate::db::SituationStore;
use crate::error::Result;
use crate::models::{CategorizedWeather, Situation};
use rand::Rng;
use std::sync::Arc;

/// What the display shows for the situation panel.
#[derive(Debug, Clone, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Loading,
    Found(Situation),
    /// The datastore had no candidate for this weather. Not an error.
    NotFound,
    Failed(String),
}

impl LookupState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading)
    }

    pub fn situation(&self) -> Option<&Situation> {
        match self {
            LookupState::Found(s) => Some(s),
            _ => None,
        }
    }
}

/// Datastore fetch → matcher.
pub struct SituationService {
    store: Arc<dyn SituationStore>,
    candidate_limit: usize,
}

impl SituationService {
    pub fn new(store: Arc<dyn SituationStore>, candidate_limit: usize) -> Self {
        Self {
            store,
            candidate_limit,
        }
    }

    pub fn store(&self) -> &Arc<dyn SituationStore> {
        &self.store
    }

    pub async fn find_candidates(&self, weather: &CategorizedWeather) -> Result<Vec<Situation>> {
        let filter = CandidateFilter::from_weather(weather, self.candidate_limit);
        let candidates = self.store.fetch_candidates(&filter).await?;
        tracing::debug!(
            backend = self.store.backend_name(),
            count = candidates.len(),
            limit = self.candidate_limit,
            "Fetched candidate situations"
        );
        Ok(candidates)
    }

    /// Best-fitting situation for `weather`, or `None` when nothing
    /// qualifies. Every call draws a fresh pick among tied candidates.
    pub async fn find_situation<R: Rng + Send>(
        &self,
        weather: &CategorizedWeather,
        rng: &mut R,
    ) -> Result<Option<Situation>> {
        let candidates = self.find_candidates(weather).await?;
        Ok(matcher::select(weather, candidates, rng))
    }

    /// `find_situation` folded into a display state.
    pub async fn lookup<R: Rng + Send>(
        &self,
        weather: &CategorizedWeather,
        rng: &mut R,
    ) -> LookupState {
        match self.find_situation(weather, rng).await {
            Ok(Some(situation)) => LookupState::Found(situation),
            Ok(None) => LookupState::NotFound,
            Err(e) => {
                tracing::warn!("Situation lookup failed: {}", e);
                LookupState::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::logic::categorizer::categorize_at;
    use crate::logic::weather_sync::fakes::rainy_evening;
    use crate::models::{SituationDraft, TimeOfDay, WeatherCondition};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service(db: &Database) -> SituationService {
        SituationService::new(Arc::new(db.clone()), 20)
    }

    #[tokio::test]
    async fn empty_store_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let weather = categorize_at(&rainy_evening(), 18);
        let mut rng = StdRng::seed_from_u64(1);

        let state = service(&db).lookup(&weather, &mut rng).await;
        assert!(matches!(state, LookupState::NotFound));
    }

    #[tokio::test]
    async fn most_specific_situation_wins() {
        let db = Database::open_in_memory().unwrap();
        db.insert_situation(&SituationDraft::new("هر هوایی")).unwrap();
        db.insert_situation(&SituationDraft::new("باران").with_weather(WeatherCondition::Rainy))
            .unwrap();
        db.insert_situation(
            &SituationDraft::new("باران عصرگاهی")
                .with_weather(WeatherCondition::Rainy)
                .with_time_of_day(TimeOfDay::Evening),
        )
        .unwrap();
        db.insert_situation(&SituationDraft::new("آفتابی").with_weather(WeatherCondition::Sunny))
            .unwrap();

        let weather = categorize_at(&rainy_evening(), 18);
        let svc = service(&db);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let found = svc.find_situation(&weather, &mut rng).await.unwrap().unwrap();
            assert_eq!(found.sentence_fa, "باران عصرگاهی");
        }
    }

    #[tokio::test]
    async fn ties_can_return_either() {
        let db = Database::open_in_memory().unwrap();
        db.insert_situation(&SituationDraft::new("الف").with_weather(WeatherCondition::Rainy))
            .unwrap();
        db.insert_situation(&SituationDraft::new("ب").with_weather(WeatherCondition::Rainy))
            .unwrap();

        let weather = categorize_at(&rainy_evening(), 18);
        let svc = service(&db);
        let mut seen = std::collections::HashSet::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..64 {
            let found = svc.find_situation(&weather, &mut rng).await.unwrap().unwrap();
            seen.insert(found.sentence_fa);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn lookup_state_accessors() {
        assert!(LookupState::Loading.is_loading());
        assert!(LookupState::NotFound.situation().is_none());
        assert!(matches!(LookupState::default(), LookupState::Idle));
    }
}
