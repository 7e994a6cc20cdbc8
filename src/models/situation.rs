use super::clothing::Clothing;
use super::music::Music;
use super::weather::{
    Category, HumidityLevel, Mood, TemperatureBand, TimeOfDay, WeatherCondition, WindLevel,
};
use crate::error::{HavaError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One dimension of a situation's weather pattern.
///
/// `Any` is a wildcard: it admits every value of the dimension when
/// candidates are fetched, but never counts as a match when they are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion<T> {
    Any,
    Specific(T),
}

impl<T> Criterion<T> {
    pub fn is_any(&self) -> bool {
        matches!(self, Criterion::Any)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Criterion::Any => None,
            Criterion::Specific(v) => Some(v),
        }
    }
}

impl<T: PartialEq> Criterion<T> {
    /// Eligibility: does a situation with this criterion qualify for `value`?
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Criterion::Any => true,
            Criterion::Specific(v) => v == value,
        }
    }

    /// Scoring: only an exact specific value counts.
    pub fn matches_exactly(&self, value: &T) -> bool {
        match self {
            Criterion::Any => false,
            Criterion::Specific(v) => v == value,
        }
    }
}

impl<T: Category> Criterion<T> {
    /// Column value for storage, `None` meaning NULL.
    pub fn as_stored(&self) -> Option<&'static str> {
        self.value().map(|v| v.as_str())
    }

    /// Parse user input where `any`, `*` and the empty string mean wildcard.
    pub fn parse_input(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "*" || trimmed.eq_ignore_ascii_case("any") {
            return Ok(Criterion::Any);
        }
        T::parse(trimmed).map(Criterion::Specific).ok_or_else(|| {
            let allowed: Vec<&str> = T::ALL.iter().map(|c| c.as_str()).collect();
            HavaError::Validation(format!(
                "unknown value '{}' (expected one of: {}, any)",
                trimmed,
                allowed.join(", ")
            ))
        })
    }
}

impl<T> Default for Criterion<T> {
    fn default() -> Self {
        Criterion::Any
    }
}

impl<T> From<Option<T>> for Criterion<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Criterion::Specific(v),
            None => Criterion::Any,
        }
    }
}

impl<T: Category> std::fmt::Display for Criterion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criterion::Any => write!(f, "any"),
            Criterion::Specific(v) => write!(f, "{}", v.as_str()),
        }
    }
}

impl<T: Serialize> Serialize for Criterion<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Criterion<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Criterion::from)
    }
}

/// An authored sentence bound to a weather pattern, with its recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Situation {
    pub id: String,
    pub weather: Criterion<WeatherCondition>,
    pub temperature: Criterion<TemperatureBand>,
    pub humidity: Criterion<HumidityLevel>,
    pub wind: Criterion<WindLevel>,
    pub time_of_day: Criterion<TimeOfDay>,
    pub mood: Option<Mood>,
    pub city: Option<String>,
    pub sentence_fa: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub music: Vec<Music>,
    #[serde(default)]
    pub clothing: Vec<Clothing>,
}

impl Situation {
    /// True when every weather dimension is a wildcard.
    pub fn is_catch_all(&self) -> bool {
        self.weather.is_any()
            && self.temperature.is_any()
            && self.humidity.is_any()
            && self.wind.is_any()
            && self.time_of_day.is_any()
    }

    /// The music item shown on the display.
    ///
    /// Associations carry no order, so this is whichever item the store
    /// returned first, not a ranked pick.
    pub fn featured_music(&self) -> Option<&Music> {
        self.music.first()
    }

    /// The clothing item shown on the display. Unranked, see `featured_music`.
    pub fn featured_clothing(&self) -> Option<&Clothing> {
        self.clothing.first()
    }

    pub fn pattern_summary(&self) -> String {
        format!(
            "{} / {} / {} / {} / {}",
            self.weather, self.temperature, self.humidity, self.wind, self.time_of_day
        )
    }

    pub fn to_draft(&self) -> SituationDraft {
        SituationDraft {
            weather: self.weather,
            temperature: self.temperature,
            humidity: self.humidity,
            wind: self.wind,
            time_of_day: self.time_of_day,
            mood: self.mood,
            city: self.city.clone(),
            sentence_fa: self.sentence_fa.clone(),
        }
    }
}

/// Editable fields of a situation, used for both insert and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SituationDraft {
    pub weather: Criterion<WeatherCondition>,
    pub temperature: Criterion<TemperatureBand>,
    pub humidity: Criterion<HumidityLevel>,
    pub wind: Criterion<WindLevel>,
    pub time_of_day: Criterion<TimeOfDay>,
    pub mood: Option<Mood>,
    pub city: Option<String>,
    pub sentence_fa: String,
}

impl SituationDraft {
    pub fn new(sentence_fa: impl Into<String>) -> Self {
        Self {
            sentence_fa: sentence_fa.into(),
            ..Default::default()
        }
    }

    pub fn with_weather(mut self, weather: WeatherCondition) -> Self {
        self.weather = Criterion::Specific(weather);
        self
    }

    pub fn with_temperature(mut self, temperature: TemperatureBand) -> Self {
        self.temperature = Criterion::Specific(temperature);
        self
    }

    pub fn with_humidity(mut self, humidity: HumidityLevel) -> Self {
        self.humidity = Criterion::Specific(humidity);
        self
    }

    pub fn with_wind(mut self, wind: WindLevel) -> Self {
        self.wind = Criterion::Specific(wind);
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = Criterion::Specific(time_of_day);
        self
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    /// Trim text fields and reject a blank sentence.
    pub fn validated(mut self) -> Result<Self> {
        self.sentence_fa = self.sentence_fa.trim().to_string();
        if self.sentence_fa.is_empty() {
            return Err(HavaError::Validation(
                "sentence_fa must not be empty".into(),
            ));
        }
        self.city = self
            .city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_admits_wildcard_and_exact() {
        let any: Criterion<WeatherCondition> = Criterion::Any;
        let rainy = Criterion::Specific(WeatherCondition::Rainy);

        assert!(any.admits(&WeatherCondition::Sunny));
        assert!(rainy.admits(&WeatherCondition::Rainy));
        assert!(!rainy.admits(&WeatherCondition::Sunny));
    }

    #[test]
    fn criterion_wildcard_never_matches_exactly() {
        let any: Criterion<TimeOfDay> = Criterion::Any;
        for t in TimeOfDay::ALL {
            assert!(!any.matches_exactly(t));
        }
        assert!(Criterion::Specific(TimeOfDay::Night).matches_exactly(&TimeOfDay::Night));
    }

    #[test]
    fn criterion_parse_input() {
        assert_eq!(
            Criterion::<WindLevel>::parse_input("any").unwrap(),
            Criterion::Any
        );
        assert_eq!(Criterion::<WindLevel>::parse_input("").unwrap(), Criterion::Any);
        assert_eq!(
            Criterion::<WindLevel>::parse_input("Windy").unwrap(),
            Criterion::Specific(WindLevel::Windy)
        );
        let err = Criterion::<WindLevel>::parse_input("gusty").unwrap_err();
        assert!(matches!(err, HavaError::Validation(_)));
    }

    #[test]
    fn criterion_serializes_as_nullable() {
        let any: Criterion<HumidityLevel> = Criterion::Any;
        assert_eq!(serde_json::to_string(&any).unwrap(), "null");
        let humid = Criterion::Specific(HumidityLevel::Humid);
        assert_eq!(serde_json::to_string(&humid).unwrap(), "\"humid\"");

        let parsed: Criterion<HumidityLevel> = serde_json::from_str("null").unwrap();
        assert!(parsed.is_any());
    }

    #[test]
    fn draft_rejects_blank_sentence() {
        let err = SituationDraft::new("   ").validated().unwrap_err();
        assert!(matches!(err, HavaError::Validation(_)));
    }

    #[test]
    fn draft_trims_fields() {
        let mut draft = SituationDraft::new("  هوا بارانی است  ");
        draft.city = Some("   ".into());
        let draft = draft.validated().unwrap();
        assert_eq!(draft.sentence_fa, "هوا بارانی است");
        assert!(draft.city.is_none());
    }
}
