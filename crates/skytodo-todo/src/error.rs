//! To-do storage errors.

use thiserror::Error;

/// Errors from loading or persisting the to-do collection.
///
/// Blank input is never an error; it is rejected silently by the list.
#[derive(Debug, Error)]
pub enum TodoError {
    /// The key-value backend failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted payload could not be decoded.
    #[error("Corrupt to-do data: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TodoError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt(message.into())
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            TodoError::Storage(_) => "Unable to save your to-do list. Please try again.",
            TodoError::Corrupt(_) => "Saved to-do data is unreadable. Consider resetting app data.",
            TodoError::Serialization(_) => "Unable to save your to-do list. Please try again.",
        }
    }
}

impl From<rusqlite::Error> for TodoError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Result type for to-do storage operations.
pub type TodoResult<T> = Result<T, TodoError>;
