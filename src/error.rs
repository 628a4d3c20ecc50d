//! Error types for the student store

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{field} is required and cannot be empty")]
    EmptyField { field: &'static str },

    #[error("student ID '{id}' already exists")]
    DuplicateId { id: String },

    #[error("student with ID '{id}' not found")]
    NotFound { id: String },

    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{} does not hold a list of student records: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
