// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the backing dictionary store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("dictionary store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dictionary data at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("bundled seed dictionary is malformed: {0}")]
    Seed(#[source] serde_json::Error),

    #[error("in-memory store rejected write: {0}")]
    Rejected(String),
}

/// Errors surfaced by the suggestion engine to its callers.
#[derive(Error, Debug)]
pub enum SuggestError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("word not found: {0}")]
    NotFound(String),

    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SuggestError>;
