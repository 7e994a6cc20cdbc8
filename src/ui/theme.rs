use crate::models::{TimeOfDay, WeatherCondition};
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

/// Panel colors chosen from the current weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherPalette {
    pub primary: Color,
    pub text: Color,
    pub accent: Color,
}

impl Theme {
    // Base colors
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Rgb(0x2E, 0x53, 0xB3);
    pub const HIGHLIGHT: Color = Color::Cyan;

    // Status colors
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    // Weather palette
    pub const NIGHT: Color = Color::Rgb(0x00, 0x00, 0x00);
    pub const DEEP_BLUE: Color = Color::Rgb(0x12, 0x32, 0x85);
    pub const ICE_BLUE: Color = Color::Rgb(0x91, 0xDB, 0xE4);
    pub const MIST: Color = Color::Rgb(0xCD, 0xDA, 0xDE);
    pub const GOLD: Color = Color::Rgb(0xDC, 0xBA, 0x31);
    pub const HEAT: Color = Color::Rgb(0xC9, 0x27, 0x00);
    pub const DUSK: Color = Color::Rgb(0xBC, 0x52, 0x56);

    // Gauge colors
    pub const TEMP_COLD: Color = Color::LightBlue;
    pub const TEMP_MILD: Color = Color::Green;
    pub const TEMP_HOT: Color = Color::Red;

    // Styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Self::FG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Night overrides everything. Sunny weather turns red above 30°C and
    /// rose around sunrise and sunset.
    pub fn weather_palette(
        weather: WeatherCondition,
        time_of_day: TimeOfDay,
        temp_celsius: i32,
        hour: u32,
    ) -> WeatherPalette {
        let palette = |primary, text, accent| WeatherPalette {
            primary,
            text,
            accent,
        };

        if time_of_day == TimeOfDay::Night {
            return palette(Self::NIGHT, Color::White, Self::ACCENT);
        }

        match weather {
            WeatherCondition::Rainy => palette(Self::DEEP_BLUE, Color::White, Self::ICE_BLUE),
            WeatherCondition::Stormy => palette(Self::DEEP_BLUE, Color::White, Self::GOLD),
            WeatherCondition::Snowy => palette(Self::ICE_BLUE, Color::Black, Self::DEEP_BLUE),
            WeatherCondition::Foggy | WeatherCondition::Cloudy => {
                palette(Self::MIST, Color::Black, Self::DEEP_BLUE)
            }
            WeatherCondition::Sunny => {
                if temp_celsius > 30 {
                    return palette(Self::HEAT, Color::White, Self::GOLD);
                }
                let twilight = matches!(time_of_day, TimeOfDay::Morning | TimeOfDay::Evening)
                    && ((5..=7).contains(&hour) || (17..=19).contains(&hour));
                if twilight {
                    palette(Self::DUSK, Color::White, Self::GOLD)
                } else {
                    palette(Self::GOLD, Color::Black, Self::DUSK)
                }
            }
        }
    }

    pub fn temp_color(temp_celsius: f64) -> Color {
        if temp_celsius < 10.0 {
            Self::TEMP_COLD
        } else if temp_celsius <= 25.0 {
            Self::TEMP_MILD
        } else {
            Self::TEMP_HOT
        }
    }

    pub fn nav_key() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_label() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::DIM)
    }
}
