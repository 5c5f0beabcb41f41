use thiserror::Error;

/// Reasons a layout payload is refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Layout has no pages")]
    NoPages,

    #[error("Duplicate {what} id: {id}")]
    DuplicateId { what: &'static str, id: String },

    #[error("Frame {from} links to missing or non-text frame {to}")]
    DanglingLink { from: String, to: String },

    #[error("Link between {from} and {to} is not symmetric")]
    AsymmetricLink { from: String, to: String },

    #[error("Frame chain starting at {0} loops")]
    Cycle(String),

    #[error("Unsupported layout version {0}")]
    Version(u32),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::Json(e.to_string())
    }
}

pub type LayoutResult<T> = Result<T, LayoutError>;
