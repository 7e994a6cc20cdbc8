use thiserror::Error;

#[derive(Error, Debug)]
pub enum HavaError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("External database error: {0}")]
    ExternalDatabase(#[from] sqlx::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Location access denied: {0}")]
    PermissionDenied(String),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl HavaError {
    /// Errors the user can fix by retrying the refresh later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HavaError::DataSourceUnavailable(_)
                | HavaError::Http(_)
                | HavaError::PermissionDenied(_)
                | HavaError::ExternalDatabase(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HavaError>;
