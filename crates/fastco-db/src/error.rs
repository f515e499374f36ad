//! Storage-layer errors and their mapping onto [`FastcoError`].

use fastco_core::error::FastcoError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Malformed record body: {0}")]
    Body(#[from] serde_json::Error),
}

impl From<DbError> for FastcoError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FastcoError::NotFound { entity, id },
            DbError::Body(e) => FastcoError::Serialization(e.to_string()),
            other => FastcoError::Database(other.to_string()),
        }
    }
}
