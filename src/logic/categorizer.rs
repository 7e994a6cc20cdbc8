use crate::models::{
    CategorizedWeather, HumidityLevel, RawWeather, TemperatureBand, TimeOfDay, WeatherCondition,
    WindLevel,
};
use chrono::{Local, Timelike, Utc};

/// Condition id assumed when the provider sends no condition entry (clear sky)
const DEFAULT_CONDITION_CODE: u32 = 800;

/// Bucket a raw reading using the local wall-clock hour for time of day.
pub fn categorize(raw: &RawWeather) -> CategorizedWeather {
    categorize_at(raw, Local::now().hour())
}

/// Bucket a raw reading for an explicit local hour (0-23).
pub fn categorize_at(raw: &RawWeather, hour: u32) -> CategorizedWeather {
    let wind_kmh = ms_to_kmh(raw.wind_speed_ms);
    let code = raw.condition_code.unwrap_or(DEFAULT_CONDITION_CODE);

    CategorizedWeather {
        weather: weather_condition(code),
        temperature: temperature_band(raw.temp_celsius),
        humidity: humidity_level(raw.humidity_percent),
        wind: wind_level(wind_kmh),
        time_of_day: time_of_day(hour),
        mood: None,
        city: raw.location_name.clone(),
        temp_celsius: raw.temp_celsius.round() as i32,
        raw_humidity: raw.humidity_percent,
        raw_wind_speed: wind_kmh,
        observed_at: Utc::now(),
    }
}

pub fn weather_condition(code: u32) -> WeatherCondition {
    WeatherCondition::from_owm_id(code)
}

/// Below 10°C cold, 10-25°C inclusive mild, above 25°C hot
pub fn temperature_band(temp_celsius: f64) -> TemperatureBand {
    if temp_celsius < 10.0 {
        TemperatureBand::Cold
    } else if temp_celsius <= 25.0 {
        TemperatureBand::Mild
    } else {
        TemperatureBand::Hot
    }
}

/// Below 30% dry, 30-70% inclusive normal, above 70% humid
pub fn humidity_level(humidity_percent: f64) -> HumidityLevel {
    if humidity_percent < 30.0 {
        HumidityLevel::Dry
    } else if humidity_percent <= 70.0 {
        HumidityLevel::Normal
    } else {
        HumidityLevel::Humid
    }
}

/// Below 10 km/h calm, 10-30 km/h inclusive breezy, above 30 km/h windy
pub fn wind_level(speed_kmh: f64) -> WindLevel {
    if speed_kmh < 10.0 {
        WindLevel::Calm
    } else if speed_kmh <= 30.0 {
        WindLevel::Breezy
    } else {
        WindLevel::Windy
    }
}

pub fn time_of_day(hour: u32) -> TimeOfDay {
    match hour {
        5..=11 => TimeOfDay::Morning,
        12..=16 => TimeOfDay::Noon,
        17..=20 => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    }
}

/// m/s to km/h, rounded to 1e-9 so conversion noise cannot cross a bucket edge.
pub fn ms_to_kmh(speed_ms: f64) -> f64 {
    (speed_ms * 3.6 * 1e9).round() / 1e9
}
