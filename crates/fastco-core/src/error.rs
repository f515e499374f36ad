//! Error types for the FASTCO entity layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastcoError {
    /// Raised for missing records and for dereferencing a soft-deleted one.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity} with id {id}")]
    AlreadyExists { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Reference cycle detected: {entity} with id {id}")]
    CycleDetected { entity: String, id: String },

    #[error("Unsupported schema version {found} (this build supports up to {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FastcoError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for FastcoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type FastcoResult<T> = Result<T, FastcoError>;
