pub mod categorizer;
pub mod filter;
pub mod matcher;
pub mod refresh;
pub mod situation_lookup;
pub mod weather_sync;

pub use filter::{CandidateFilter, SqlDialect, SqlFilter, DEFAULT_CANDIDATE_LIMIT};
pub use refresh::{RefreshOutcome, RequestGenerations};
pub use situation_lookup::{LookupState, SituationService};
pub use weather_sync::WeatherService;
