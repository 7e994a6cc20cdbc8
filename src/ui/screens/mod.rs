pub mod library;
pub mod weather;

pub use library::LibraryScreen;
pub use weather::WeatherScreen;
