pub mod gauge;

pub use gauge::{humidity_gauge, temperature_gauge, wind_gauge};
