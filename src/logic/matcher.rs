use crate::models::{CategorizedWeather, Situation};
use rand::Rng;
use tracing::debug;

/// Per-dimension weights for an exact match. Wildcards score nothing.
pub const WEATHER_WEIGHT: u32 = 5;
pub const TEMPERATURE_WEIGHT: u32 = 3;
pub const TIME_OF_DAY_WEIGHT: u32 = 2;
pub const HUMIDITY_WEIGHT: u32 = 1;
pub const WIND_WEIGHT: u32 = 1;

pub const MAX_SCORE: u32 =
    WEATHER_WEIGHT + TEMPERATURE_WEIGHT + TIME_OF_DAY_WEIGHT + HUMIDITY_WEIGHT + WIND_WEIGHT;

/// A candidate with its score against one weather observation
#[derive(Debug, Clone)]
pub struct ScoredSituation<'a> {
    pub situation: &'a Situation,
    pub score: u32,
    pub matched: Vec<&'static str>,
}

/// Weighted sum of the dimensions on which `situation` names exactly the
/// observed value.
pub fn score(situation: &Situation, weather: &CategorizedWeather) -> u32 {
    matched_dimensions(situation, weather)
        .iter()
        .map(|(_, weight)| weight)
        .sum()
}

fn matched_dimensions(
    situation: &Situation,
    weather: &CategorizedWeather,
) -> Vec<(&'static str, u32)> {
    let checks = [
        (
            "weather",
            WEATHER_WEIGHT,
            situation.weather.matches_exactly(&weather.weather),
        ),
        (
            "temperature",
            TEMPERATURE_WEIGHT,
            situation.temperature.matches_exactly(&weather.temperature),
        ),
        (
            "time_of_day",
            TIME_OF_DAY_WEIGHT,
            situation.time_of_day.matches_exactly(&weather.time_of_day),
        ),
        (
            "humidity",
            HUMIDITY_WEIGHT,
            situation.humidity.matches_exactly(&weather.humidity),
        ),
        ("wind", WIND_WEIGHT, situation.wind.matches_exactly(&weather.wind)),
    ];

    checks
        .into_iter()
        .filter(|(_, _, hit)| *hit)
        .map(|(name, weight, _)| (name, weight))
        .collect()
}

/// Score every candidate, highest first. Ties keep their input order.
pub fn rank<'a>(weather: &CategorizedWeather, candidates: &'a [Situation]) -> Vec<ScoredSituation<'a>> {
    let mut scored: Vec<ScoredSituation> = candidates
        .iter()
        .map(|situation| {
            let dims = matched_dimensions(situation, weather);
            ScoredSituation {
                situation,
                score: dims.iter().map(|(_, w)| w).sum(),
                matched: dims.into_iter().map(|(name, _)| name).collect(),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// All candidates sharing the maximum score.
pub fn top_matches<'a>(weather: &CategorizedWeather, candidates: &'a [Situation]) -> Vec<&'a Situation> {
    let Some(max_score) = candidates.iter().map(|s| score(s, weather)).max() else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter(|s| score(s, weather) == max_score)
        .collect()
}

/// Pick one of the best-scoring candidates uniformly at random.
///
/// Candidates are expected to be pre-filtered so that every dimension either
/// equals the observation or is a wildcard. Returns `None` for an empty set.
/// Each call draws from `rng` again; nothing is cached between calls.
pub fn select<R: Rng>(
    weather: &CategorizedWeather,
    mut candidates: Vec<Situation>,
    rng: &mut R,
) -> Option<Situation> {
    if candidates.is_empty() {
        debug!("No candidate situations to match");
        return None;
    }

    let scores: Vec<u32> = candidates.iter().map(|s| score(s, weather)).collect();
    let max_score = scores.iter().copied().max().unwrap_or(0);

    for scored in rank(weather, &candidates) {
        debug!(
            score = scored.score,
            matched = %scored.matched.join(", "),
            sentence = %scored.situation.sentence_fa,
            "Scored situation"
        );
    }

    let top: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == max_score)
        .map(|(i, _)| i)
        .collect();

    let pick = top[rng.random_range(0..top.len())];
    let selected = candidates.swap_remove(pick);

    debug!(
        max_score,
        tied = top.len(),
        id = %selected.id,
        sentence = %selected.sentence_fa,
        "Selected situation"
    );

    Some(selected)
}
