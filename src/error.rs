//! Error taxonomy shared by the store and the checkout workflow.
//!
//! Storage faults stay in [`StoreError`]; everything the user can trigger by
//! interacting with the form or the table is a [`WorkflowError`] variant that
//! the UI turns into a notice.

use std::io;

use thiserror::Error;

/// Failures raised by a [`CatalogStore`](crate::db::CatalogStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert collided with an existing `Book_ID`.
    #[error("Book ID {0} already exists in the database.")]
    DuplicateKey(String),

    #[error("failed to prepare data directory")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Failures surfaced by the checkout workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Book ID {0} already exists in the database.")]
    DuplicateKey(String),

    /// Required input was empty or the prompt was cancelled.
    #[error("{0}")]
    InvalidEntry(String),

    /// The action needs a selected record. Carries the verb for the message.
    #[error("Please select a record to {0}.")]
    NoSelection(&'static str),

    /// The user declined a confirmation.
    #[error("{0}")]
    ActionDenied(String),

    #[error("database error: {0}")]
    Store(StoreError),

    #[error("dialog failed: {0}")]
    Prompt(#[from] io::Error),
}

impl WorkflowError {
    /// Dialog title used when the UI reports this error.
    pub fn title(&self) -> &'static str {
        match self {
            WorkflowError::DuplicateKey(_) => "Duplicate Entry",
            WorkflowError::InvalidEntry(_) => "Invalid Entry",
            WorkflowError::NoSelection(_) => "Selection Error",
            WorkflowError::ActionDenied(_) => "Action Denied",
            WorkflowError::Store(_) => "Database Error",
            WorkflowError::Prompt(_) => "Terminal Error",
        }
    }
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(book_id) => WorkflowError::DuplicateKey(book_id),
            other => WorkflowError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_is_lifted_out_of_store_errors() {
        let err = WorkflowError::from(StoreError::DuplicateKey("B1".into()));
        assert!(matches!(err, WorkflowError::DuplicateKey(ref id) if id == "B1"));
        assert_eq!(err.title(), "Duplicate Entry");
        assert_eq!(err.to_string(), "Book ID B1 already exists in the database.");
    }

    #[test]
    fn other_store_errors_stay_wrapped() {
        let err = WorkflowError::from(StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        assert!(matches!(err, WorkflowError::Store(_)));
        assert_eq!(err.title(), "Database Error");
    }

    #[test]
    fn no_selection_names_the_action() {
        let err = WorkflowError::NoSelection("delete");
        assert_eq!(err.to_string(), "Please select a record to delete.");
    }
}
