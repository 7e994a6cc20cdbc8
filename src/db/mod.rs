mod connection;
mod migrations;
mod queries;
pub mod remote;
mod store;

pub use connection::Database;
pub use remote::PgSituationStore;
pub use store::SituationStore;

use crate::config::{Config, DatastoreBackend};
use crate::error::Result;
use crate::models::{Category, Criterion, Mood};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Open whichever datastore the config selects.
pub async fn open_store(
    config: &Config,
    data_dir_override: Option<&PathBuf>,
) -> Result<Arc<dyn SituationStore>> {
    match config.datastore.backend {
        DatastoreBackend::Sqlite => Ok(Arc::new(Database::open(data_dir_override)?)),
        DatastoreBackend::Postgres => {
            let url = config.datastore.postgres_url.as_deref().ok_or_else(|| {
                crate::error::HavaError::Config(
                    "datastore.postgres_url is required for the postgres backend".into(),
                )
            })?;
            Ok(Arc::new(PgSituationStore::connect(url).await?))
        }
    }
}

/// Read a nullable category column. Values outside the known set are logged
/// and treated as a wildcard instead of failing the whole row.
pub(crate) fn stored_criterion<T: Category>(column: &str, value: Option<String>) -> Criterion<T> {
    match value {
        None => Criterion::Any,
        Some(raw) => match T::parse(&raw) {
            Some(v) => Criterion::Specific(v),
            None => {
                warn!(column, value = %raw, "Unknown category in database, treating as any");
                Criterion::Any
            }
        },
    }
}

pub(crate) fn stored_mood(value: Option<String>) -> Option<Mood> {
    value.and_then(|raw| {
        Mood::parse(&raw).or_else(|| {
            warn!(mood = %raw, "Unknown mood in database, ignoring");
            None
        })
    })
}

pub(crate) fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
