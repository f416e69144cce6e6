use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension, Row};
use tracing::debug;

use crate::error::StoreError;
use crate::models::Book;

const SELECT_BOOKS: &str = "SELECT Title, Book_ID, Author, Status, Issuer_ID FROM Books";

/// Every book in insertion order. `rowid` keeps the order stable across
/// updates, which matches how the table view lists records.
pub fn fetch_books(conn: &Connection) -> Result<Vec<Book>, StoreError> {
    let mut stmt = conn.prepare(&format!("{SELECT_BOOKS} ORDER BY rowid"))?;
    let books = stmt
        .query_map([], book_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(books)
}

pub fn find_book(conn: &Connection, book_id: &str) -> Result<Option<Book>, StoreError> {
    let book = conn
        .query_row(
            &format!("{SELECT_BOOKS} WHERE Book_ID = ?1"),
            [book_id],
            book_from_row,
        )
        .optional()?;
    Ok(book)
}

/// Insert a new record. A primary key collision leaves the table untouched
/// and comes back as [`StoreError::DuplicateKey`].
pub fn insert_book(conn: &Connection, book: &Book) -> Result<(), StoreError> {
    debug!(book_id = %book.book_id, "inserting book");
    conn.execute(
        "INSERT INTO Books (Title, Book_ID, Author, Status, Issuer_ID) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            book.title,
            book.book_id,
            book.author,
            book.status,
            book.issuer_id
        ],
    )
    .map_err(|err| map_unique_constraint(err, &book.book_id))?;
    Ok(())
}

/// Overwrite the mutable columns of the record keyed by `book_id`. Unknown ids
/// touch zero rows, which is not treated as an error.
pub fn update_book(conn: &Connection, book_id: &str, book: &Book) -> Result<(), StoreError> {
    let updated = conn.execute(
        "UPDATE Books SET Title = ?1, Author = ?2, Status = ?3, Issuer_ID = ?4 WHERE Book_ID = ?5",
        params![book.title, book.author, book.status, book.issuer_id, book_id],
    )?;
    debug!(book_id, updated, "updated book");
    Ok(())
}

pub fn delete_book(conn: &Connection, book_id: &str) -> Result<(), StoreError> {
    let deleted = conn.execute("DELETE FROM Books WHERE Book_ID = ?1", [book_id])?;
    debug!(book_id, deleted, "deleted book");
    Ok(())
}

pub fn delete_all_books(conn: &Connection) -> Result<(), StoreError> {
    let deleted = conn.execute("DELETE FROM Books", [])?;
    debug!(deleted, "cleared inventory");
    Ok(())
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        title: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        book_id: row.get(1)?,
        author: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        status: row.get::<_, Option<_>>(3)?.unwrap_or_default(),
        issuer_id: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

/// The only constraint on `Books` is the primary key, so any constraint
/// violation on insert is a duplicate id.
fn map_unique_constraint(err: SqlError, book_id: &str) -> StoreError {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        StoreError::DuplicateKey(book_id.to_string())
    } else {
        err.into()
    }
}
