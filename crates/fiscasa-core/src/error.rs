use thiserror::Error;

#[derive(Debug, Error)]
pub enum FiscasaError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid obligation identifier '{id}': {reason}")]
    InvalidObligationId { id: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FiscasaError {
    fn from(e: serde_json::Error) -> Self {
        FiscasaError::SerializationError(e.to_string())
    }
}
