//! Domain models that mirror the `Books` table and get passed throughout the
//! TUI. These stay light-weight data holders so the workflow and the
//! presentation layer can focus on rules and rendering.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use thiserror::Error;

/// Issuer value stored for every book that is on the shelf.
pub const ISSUER_SENTINEL: &str = "N/A";

/// Checkout state of a book. Persisted as the text `Available` / `Issued`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookStatus {
    #[default]
    Available,
    Issued,
}

impl BookStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Issued => "Issued",
        }
    }

    /// The other state. Used by the form's status selector.
    pub fn toggled(self) -> Self {
        match self {
            BookStatus::Available => BookStatus::Issued,
            BookStatus::Issued => BookStatus::Available,
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown book status {0:?}")]
pub struct ParseStatusError(String);

impl FromStr for BookStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(BookStatus::Available),
            "Issued" => Ok(BookStatus::Issued),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl ToSql for BookStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BookStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `Books` table.
pub struct Book {
    pub title: String,
    /// Primary key. Never rewritten once a record exists; updates are keyed by
    /// it instead.
    pub book_id: String,
    pub author: String,
    pub status: BookStatus,
    /// Borrower card id while issued, [`ISSUER_SENTINEL`] otherwise.
    pub issuer_id: String,
}

impl Book {
    /// Build an on-shelf record with the sentinel issuer.
    pub fn available(title: &str, book_id: &str, author: &str) -> Self {
        Self {
            title: title.to_string(),
            book_id: book_id.to_string(),
            author: author.to_string(),
            status: BookStatus::Available,
            issuer_id: ISSUER_SENTINEL.to_string(),
        }
    }

    pub fn is_issued(&self) -> bool {
        self.status == BookStatus::Issued
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.book_id)
    }
}
