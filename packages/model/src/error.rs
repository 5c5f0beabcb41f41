use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// A structural rule broken by a content tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{child} is not allowed inside {parent} at {path:?}")]
    DisallowedChild {
        parent: String,
        child: String,
        path: Vec<usize>,
    },

    #[error("{kind} at {path:?} cannot be empty")]
    EmptyContainer { kind: String, path: Vec<usize> },

    #[error("{kind} at {path:?} has no text run")]
    MissingTextRun { kind: String, path: Vec<usize> },

    #[error("Heading at {path:?} has invalid level {level}")]
    InvalidHeadingLevel { level: u8, path: Vec<usize> },

    #[error("Duplicate {what}: {name}")]
    Duplicate { what: String, name: String },
}

impl ValidationError {
    pub fn disallowed(parent: impl Into<String>, child: impl Into<String>, path: &[usize]) -> Self {
        Self::DisallowedChild {
            parent: parent.into(),
            child: child.into(),
            path: path.to_vec(),
        }
    }

    pub fn empty(kind: impl Into<String>, path: &[usize]) -> Self {
        Self::EmptyContainer {
            kind: kind.into(),
            path: path.to_vec(),
        }
    }

    pub fn missing_text(kind: impl Into<String>, path: &[usize]) -> Self {
        Self::MissingTextRun {
            kind: kind.into(),
            path: path.to_vec(),
        }
    }

    pub fn duplicate(what: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Duplicate {
            what: what.into(),
            name: name.into(),
        }
    }
}
