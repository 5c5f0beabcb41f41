//! Error types for the editor

use folio_model::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    /// The payload was rejected; the previous document is untouched
    #[error("Load failed: {0}")]
    LoadFailed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl EditorError {
    pub fn load_failed(reason: impl std::fmt::Display) -> Self {
        EditorError::LoadFailed(reason.to_string())
    }
}
