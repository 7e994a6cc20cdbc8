use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discrete bucket of one weather dimension.
///
/// `as_str` is the canonical lowercase name used in storage, config and the
/// CLI. `parse` accepts any casing and surrounding whitespace.
pub trait Category: Copy + Eq + std::fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

/// Weather condition buckets derived from OpenWeatherMap condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
    Foggy,
}

impl WeatherCondition {
    /// Map an OpenWeatherMap condition id onto a bucket.
    ///
    /// Drizzle (3xx) and rain (5xx) share a bucket, the whole 7xx
    /// atmosphere group is fog. Unknown ids fall back to sunny.
    pub fn from_owm_id(id: u32) -> Self {
        match id {
            200..=299 => WeatherCondition::Stormy,
            300..=599 => WeatherCondition::Rainy,
            600..=699 => WeatherCondition::Snowy,
            700..=799 => WeatherCondition::Foggy,
            800 => WeatherCondition::Sunny,
            801..=899 => WeatherCondition::Cloudy,
            _ => WeatherCondition::Sunny,
        }
    }

    pub fn fa_name(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "آفتابی",
            WeatherCondition::Cloudy => "ابری",
            WeatherCondition::Rainy => "بارانی",
            WeatherCondition::Snowy => "برفی",
            WeatherCondition::Stormy => "طوفانی",
            WeatherCondition::Foggy => "مه‌آلود",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "☀",
            WeatherCondition::Cloudy => "☁",
            WeatherCondition::Rainy => "🌧",
            WeatherCondition::Snowy => "❄",
            WeatherCondition::Stormy => "⛈",
            WeatherCondition::Foggy => "🌫",
        }
    }
}

impl Category for WeatherCondition {
    const ALL: &'static [Self] = &[
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::Snowy,
        WeatherCondition::Stormy,
        WeatherCondition::Foggy,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Snowy => "snowy",
            WeatherCondition::Stormy => "stormy",
            WeatherCondition::Foggy => "foggy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    Cold,
    Mild,
    Hot,
}

impl TemperatureBand {
    pub fn fa_name(&self) -> &'static str {
        match self {
            TemperatureBand::Cold => "سرد",
            TemperatureBand::Mild => "معتدل",
            TemperatureBand::Hot => "گرم",
        }
    }
}

impl Category for TemperatureBand {
    const ALL: &'static [Self] = &[
        TemperatureBand::Cold,
        TemperatureBand::Mild,
        TemperatureBand::Hot,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            TemperatureBand::Cold => "cold",
            TemperatureBand::Mild => "mild",
            TemperatureBand::Hot => "hot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityLevel {
    Dry,
    Normal,
    Humid,
}

impl Category for HumidityLevel {
    const ALL: &'static [Self] = &[HumidityLevel::Dry, HumidityLevel::Normal, HumidityLevel::Humid];

    fn as_str(&self) -> &'static str {
        match self {
            HumidityLevel::Dry => "dry",
            HumidityLevel::Normal => "normal",
            HumidityLevel::Humid => "humid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindLevel {
    Calm,
    Breezy,
    Windy,
}

impl Category for WindLevel {
    const ALL: &'static [Self] = &[WindLevel::Calm, WindLevel::Breezy, WindLevel::Windy];

    fn as_str(&self) -> &'static str {
        match self {
            WindLevel::Calm => "calm",
            WindLevel::Breezy => "breezy",
            WindLevel::Windy => "windy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Noon,
    Evening,
    Night,
}

impl Category for TimeOfDay {
    const ALL: &'static [Self] = &[
        TimeOfDay::Morning,
        TimeOfDay::Noon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Noon => "noon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

/// Mood tag carried by situations. Not derived from weather and never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Calm,
    Romantic,
}

impl Mood {
    pub fn fa_name(&self) -> &'static str {
        match self {
            Mood::Happy => "شاد",
            Mood::Sad => "غمگین",
            Mood::Energetic => "پرانرژی",
            Mood::Calm => "آرام",
            Mood::Romantic => "رمانتیک",
        }
    }
}

impl Category for Mood {
    const ALL: &'static [Self] = &[
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Calm,
        Mood::Romantic,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Romantic => "romantic",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    WeatherCondition,
    TemperatureBand,
    HumidityLevel,
    WindLevel,
    TimeOfDay,
    Mood
);

/// Current conditions as reported by the weather provider, before bucketing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWeather {
    pub temp_celsius: f64,
    pub humidity_percent: f64,
    pub wind_speed_ms: f64,
    /// First condition id of the response, if the provider sent any
    pub condition_code: Option<u32>,
    pub summary: String,
    pub description: String,
    pub location_name: String,
}

/// Bucketed weather used for situation matching. Built fresh on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedWeather {
    pub weather: WeatherCondition,
    pub temperature: TemperatureBand,
    pub humidity: HumidityLevel,
    pub wind: WindLevel,
    pub time_of_day: TimeOfDay,
    pub mood: Option<Mood>,
    pub city: String,
    pub temp_celsius: i32,
    pub raw_humidity: f64,
    /// km/h
    pub raw_wind_speed: f64,
    pub observed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_condition_from_owm_id() {
        assert_eq!(WeatherCondition::from_owm_id(211), WeatherCondition::Stormy);
        assert_eq!(WeatherCondition::from_owm_id(311), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_owm_id(501), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_owm_id(601), WeatherCondition::Snowy);
        assert_eq!(WeatherCondition::from_owm_id(741), WeatherCondition::Foggy);
        assert_eq!(WeatherCondition::from_owm_id(804), WeatherCondition::Cloudy);
    }

    #[test]
    fn weather_condition_boundaries() {
        assert_ne!(WeatherCondition::from_owm_id(199), WeatherCondition::Stormy);
        assert_eq!(WeatherCondition::from_owm_id(199), WeatherCondition::Sunny);
        assert_eq!(WeatherCondition::from_owm_id(200), WeatherCondition::Stormy);
        assert_eq!(WeatherCondition::from_owm_id(299), WeatherCondition::Stormy);
        assert_eq!(WeatherCondition::from_owm_id(300), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_owm_id(599), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_owm_id(600), WeatherCondition::Snowy);
        assert_eq!(WeatherCondition::from_owm_id(700), WeatherCondition::Foggy);
        assert_eq!(WeatherCondition::from_owm_id(799), WeatherCondition::Foggy);
        assert_eq!(WeatherCondition::from_owm_id(800), WeatherCondition::Sunny);
        assert_eq!(WeatherCondition::from_owm_id(801), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_owm_id(899), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_owm_id(900), WeatherCondition::Sunny);
        assert_eq!(WeatherCondition::from_owm_id(0), WeatherCondition::Sunny);
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(WeatherCondition::parse("Rainy"), Some(WeatherCondition::Rainy));
        assert_eq!(TimeOfDay::parse(" EVENING "), Some(TimeOfDay::Evening));
        assert_eq!(WindLevel::parse("breezy"), Some(WindLevel::Breezy));
        assert_eq!(Mood::parse("romantic"), Some(Mood::Romantic));
    }

    #[test]
    fn category_parse_rejects_unknown() {
        assert_eq!(WeatherCondition::parse("drizzle"), None);
        assert_eq!(HumidityLevel::parse(""), None);
        assert_eq!(TemperatureBand::parse("warm"), None);
    }

    #[test]
    fn category_names_round_trip() {
        for c in WeatherCondition::ALL {
            assert_eq!(WeatherCondition::parse(c.as_str()), Some(*c));
        }
        for t in TimeOfDay::ALL {
            assert_eq!(TimeOfDay::parse(&t.to_string()), Some(*t));
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&TimeOfDay::Evening).unwrap();
        assert_eq!(json, "\"evening\"");
        let parsed: WeatherCondition = serde_json::from_str("\"foggy\"").unwrap();
        assert_eq!(parsed, WeatherCondition::Foggy);
    }
}
