//! Error types for yml_catalog_sync

use thiserror::Error;

/// Unified error type for catalog loading, extraction and database sync
#[derive(Debug, Error)]
pub enum SyncError {
    /// The feed could not be fetched or opened
    #[error("Source unavailable ({source_url}): {reason}")]
    SourceUnavailable { source_url: String, reason: String },

    /// The feed was fetched but is not parseable XML
    #[error("Malformed document: {0}")]
    MalformedDocument(#[from] roxmltree::Error),

    /// A decimal field that is present could not be parsed
    #[error("Invalid {field} for {entity} '{id}': '{value}'")]
    NumericFormat {
        entity: &'static str,
        field: &'static str,
        id: String,
        value: String,
    },

    /// The destination table lacks one or more expected columns
    #[error("Structure of table {table} has changed. Expected columns: {expected:?}, actual: {actual:?}")]
    SchemaMismatch {
        table: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A table name outside the known catalog tables was requested
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// A batch upsert or DDL statement failed at the destination
    #[error("Error writing {entity}: {source}")]
    WriteFailed {
        entity: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Records could not be rendered as JSON
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Opening the database or reading its metadata failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl SyncError {
    pub(crate) fn unavailable(source_url: &str, reason: impl ToString) -> Self {
        SyncError::SourceUnavailable {
            source_url: source_url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write_failed(entity: &str) -> impl FnOnce(rusqlite::Error) -> Self + '_ {
        move |source| SyncError::WriteFailed {
            entity: entity.to_string(),
            source,
        }
    }
}

/// Result alias for yml_catalog_sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
