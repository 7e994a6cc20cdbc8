use super::matcher::{
    HUMIDITY_WEIGHT, TEMPERATURE_WEIGHT, TIME_OF_DAY_WEIGHT, WEATHER_WEIGHT, WIND_WEIGHT,
};
use crate::models::{
    CategorizedWeather, Category, HumidityLevel, Situation, TemperatureBand, TimeOfDay,
    WeatherCondition, WindLevel,
};

pub const DEFAULT_CANDIDATE_LIMIT: usize = 20;

/// Which candidate situations the datastore should return for an observation.
///
/// For every dimension with a value, a situation qualifies when its column
/// equals that value or is NULL (wildcard). Dimensions without a value
/// impose nothing. Conditions are AND-ed across dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFilter {
    pub weather: Option<WeatherCondition>,
    pub temperature: Option<TemperatureBand>,
    pub humidity: Option<HumidityLevel>,
    pub wind: Option<WindLevel>,
    pub time_of_day: Option<TimeOfDay>,
    pub limit: usize,
}

/// Placeholder syntax of the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Sqlite,
    Postgres,
}

impl SqlDialect {
    fn placeholder(&self, index: usize) -> String {
        match self {
            SqlDialect::Sqlite => format!("?{}", index),
            SqlDialect::Postgres => format!("${}", index),
        }
    }
}

/// WHERE/ORDER BY fragments plus the values to bind, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    pub where_clause: String,
    pub order_by: String,
    pub params: Vec<&'static str>,
    pub limit: usize,
}

impl CandidateFilter {
    pub fn from_weather(weather: &CategorizedWeather, limit: usize) -> Self {
        Self {
            weather: Some(weather.weather),
            temperature: Some(weather.temperature),
            humidity: Some(weather.humidity),
            wind: Some(weather.wind),
            time_of_day: Some(weather.time_of_day),
            limit,
        }
    }

    /// In-memory form of the same predicate the SQL stores push down.
    pub fn admits(&self, situation: &Situation) -> bool {
        self.weather.is_none_or(|v| situation.weather.admits(&v))
            && self.temperature.is_none_or(|v| situation.temperature.admits(&v))
            && self.humidity.is_none_or(|v| situation.humidity.admits(&v))
            && self.wind.is_none_or(|v| situation.wind.admits(&v))
            && self.time_of_day.is_none_or(|v| situation.time_of_day.admits(&v))
    }

    fn dimensions(&self) -> Vec<(&'static str, &'static str, u32)> {
        let mut dims = Vec::new();
        if let Some(v) = self.weather {
            dims.push(("weather", v.as_str(), WEATHER_WEIGHT));
        }
        if let Some(v) = self.temperature {
            dims.push(("temperature", v.as_str(), TEMPERATURE_WEIGHT));
        }
        if let Some(v) = self.humidity {
            dims.push(("humidity", v.as_str(), HUMIDITY_WEIGHT));
        }
        if let Some(v) = self.wind {
            dims.push(("wind", v.as_str(), WIND_WEIGHT));
        }
        if let Some(v) = self.time_of_day {
            dims.push(("time_of_day", v.as_str(), TIME_OF_DAY_WEIGHT));
        }
        dims
    }

    /// Build SQL fragments for the `situations` table.
    ///
    /// Rows are ordered by specificity (the matcher's weights over the
    /// non-NULL filtered columns) and then randomly, so the row cap never
    /// drops a candidate that outscores one it keeps and never favours one
    /// side of a tie.
    pub fn to_sql(&self, dialect: SqlDialect) -> SqlFilter {
        let dims = self.dimensions();

        let where_clause = if dims.is_empty() {
            "1 = 1".to_string()
        } else {
            dims.iter()
                .enumerate()
                .map(|(i, (column, _, _))| {
                    format!(
                        "({col} = {ph} OR {col} IS NULL)",
                        col = column,
                        ph = dialect.placeholder(i + 1)
                    )
                })
                .collect::<Vec<_>>()
                .join(" AND ")
        };

        let specificity = if dims.is_empty() {
            "0".to_string()
        } else {
            dims.iter()
                .map(|(column, _, weight)| {
                    format!("CASE WHEN {} IS NOT NULL THEN {} ELSE 0 END", column, weight)
                })
                .collect::<Vec<_>>()
                .join(" + ")
        };

        SqlFilter {
            where_clause,
            order_by: format!("({}) DESC, RANDOM()", specificity),
            params: dims.iter().map(|(_, value, _)| *value).collect(),
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Criterion;
    use chrono::Utc;

    fn weather() -> CategorizedWeather {
        CategorizedWeather {
            weather: WeatherCondition::Snowy,
            temperature: TemperatureBand::Cold,
            humidity: HumidityLevel::Humid,
            wind: WindLevel::Windy,
            time_of_day: TimeOfDay::Morning,
            mood: None,
            city: "Tabriz".into(),
            temp_celsius: -3,
            raw_humidity: 85.0,
            raw_wind_speed: 40.0,
            observed_at: Utc::now(),
        }
    }

    fn situation() -> Situation {
        Situation {
            id: "s".into(),
            weather: Criterion::Any,
            temperature: Criterion::Any,
            humidity: Criterion::Any,
            wind: Criterion::Any,
            time_of_day: Criterion::Any,
            mood: None,
            city: None,
            sentence_fa: "برف".into(),
            created_at: Utc::now(),
            music: Vec::new(),
            clothing: Vec::new(),
        }
    }

    #[test]
    fn catch_all_is_always_admitted() {
        let filter = CandidateFilter::from_weather(&weather(), DEFAULT_CANDIDATE_LIMIT);
        assert!(filter.admits(&situation()));
    }

    #[test]
    fn mismatched_dimension_is_excluded() {
        let filter = CandidateFilter::from_weather(&weather(), DEFAULT_CANDIDATE_LIMIT);
        let sunny = Situation {
            weather: Criterion::Specific(WeatherCondition::Sunny),
            ..situation()
        };
        assert!(!filter.admits(&sunny));

        let snowy_but_noon = Situation {
            weather: Criterion::Specific(WeatherCondition::Snowy),
            time_of_day: Criterion::Specific(TimeOfDay::Noon),
            ..situation()
        };
        assert!(!filter.admits(&snowy_but_noon));
    }

    #[test]
    fn absent_dimension_imposes_nothing() {
        let filter = CandidateFilter {
            weather: Some(WeatherCondition::Snowy),
            temperature: None,
            humidity: None,
            wind: None,
            time_of_day: None,
            limit: 5,
        };
        let hot_snow = Situation {
            weather: Criterion::Specific(WeatherCondition::Snowy),
            temperature: Criterion::Specific(TemperatureBand::Hot),
            ..situation()
        };
        assert!(filter.admits(&hot_snow));
    }

    #[test]
    fn sql_ands_wildcard_clauses() {
        let filter = CandidateFilter::from_weather(&weather(), 20);
        let sql = filter.to_sql(SqlDialect::Sqlite);

        assert_eq!(
            sql.where_clause,
            "(weather = ?1 OR weather IS NULL) AND (temperature = ?2 OR temperature IS NULL) \
             AND (humidity = ?3 OR humidity IS NULL) AND (wind = ?4 OR wind IS NULL) \
             AND (time_of_day = ?5 OR time_of_day IS NULL)"
        );
        assert_eq!(sql.params, vec!["snowy", "cold", "humid", "windy", "morning"]);
        assert_eq!(sql.limit, 20);
        assert!(sql.order_by.starts_with("(CASE WHEN weather IS NOT NULL THEN 5 ELSE 0 END"));
        assert!(sql.order_by.ends_with("DESC, RANDOM()"));
    }

    #[test]
    fn sql_postgres_placeholders() {
        let filter = CandidateFilter {
            weather: None,
            temperature: Some(TemperatureBand::Mild),
            humidity: None,
            wind: Some(WindLevel::Calm),
            time_of_day: None,
            limit: 20,
        };
        let sql = filter.to_sql(SqlDialect::Postgres);
        assert_eq!(
            sql.where_clause,
            "(temperature = $1 OR temperature IS NULL) AND (wind = $2 OR wind IS NULL)"
        );
        assert_eq!(sql.params, vec!["mild", "calm"]);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = CandidateFilter {
            weather: None,
            temperature: None,
            humidity: None,
            wind: None,
            time_of_day: None,
            limit: 20,
        };
        let sql = filter.to_sql(SqlDialect::Sqlite);
        assert_eq!(sql.where_clause, "1 = 1");
        assert!(sql.params.is_empty());
    }
}
