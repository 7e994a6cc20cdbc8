pub mod components;
pub mod persian;
pub mod screens;
mod theme;

pub use theme::{Theme, WeatherPalette};
