use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropertyDealError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PropertyDealError {
    fn from(e: serde_json::Error) -> Self {
        PropertyDealError::SerializationError(e.to_string())
    }
}
