use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed observation: negative price, unknown currency, timestamp
    /// beyond the skew tolerance. Not retryable; the caller must fix or
    /// discard the observation.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Product or store id could not be resolved through the catalog.
    #[error("Unknown reference: {0}")]
    UnknownReference(String),
    /// Transient storage failure. Retryable with backoff; re-delivering the
    /// same observation is safe.
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Not found")]
    NotFound,
}

impl EngineError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Storage(_))
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => EngineError::NotFound,
            other => EngineError::Storage(other.to_string()),
        }
    }
}

impl From<String> for EngineError {
    fn from(value: String) -> Self {
        EngineError::Validation(value)
    }
}
