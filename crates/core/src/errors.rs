use thiserror::Error;

use crate::envelope::{STATUS_INTERNAL, STATUS_NOT_FOUND};

/// Failures raised by a supplier master-data source.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("supplier directory unavailable: {0}")]
    Unavailable(String),
    #[error("supplier directory decode failure: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SkillError {
    #[error("Supplier {id} not found.")]
    NotFound { id: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("strategy backend failure: {0}")]
    Backend(String),
}

impl SkillError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => STATUS_NOT_FOUND,
            Self::InvalidInput(_) | Self::Directory(_) | Self::Backend(_) => STATUS_INTERNAL,
        }
    }

    /// Caller-visible message. Internal faults collapse to the skill's
    /// generic message so the original fault never leaves the boundary.
    pub fn user_message(&self, internal_message: &str) -> String {
        match self {
            Self::NotFound { .. } => self.to_string(),
            Self::InvalidInput(_) | Self::Directory(_) | Self::Backend(_) => {
                internal_message.to_string()
            }
        }
    }
}
