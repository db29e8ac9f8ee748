use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocsError {
    #[error("Member '{member}' is not a property of schema '{schema}'")]
    SchemaMemberNotFound { member: String, schema: String },

    #[error("Documentation content not found: {}", path.display())]
    ContentNotFound { path: PathBuf },

    #[error("Schema '{schema}' references missing schema '{reference}'")]
    UnresolvedReference { reference: String, schema: String },

    #[error("No example registered for type: {0}")]
    UnknownExampleType(String),

    #[error("Failed to serialize example: {0}")]
    Serialization(String),

    #[error("Invalid documentation configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid annotation manifest: {0}")]
    Manifest(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

pub type DocsResult<T> = Result<T, DocsError>;
