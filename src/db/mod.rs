//! Persistence for the book catalog, split into schema setup and the row-level
//! queries. [`SqliteCatalog`] bundles the connection with those queries behind
//! the [`CatalogStore`] trait so the checkout workflow never touches SQL.

mod books;
mod connection;

use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreError;
use crate::models::Book;

pub use books::{delete_all_books, delete_book, fetch_books, find_book, insert_book, update_book};
pub use connection::{ensure_schema, open_database, open_in_memory_database};

/// Durable collection of book records keyed by `book_id`.
///
/// Every mutating call is committed before it returns.
pub trait CatalogStore {
    fn list_all(&self) -> Result<Vec<Book>, StoreError>;

    fn find(&self, book_id: &str) -> Result<Option<Book>, StoreError>;

    /// Fails with [`StoreError::DuplicateKey`] when the id is taken.
    fn insert(&mut self, book: &Book) -> Result<(), StoreError>;

    /// Overwrites title, author, status and issuer. Missing ids are ignored.
    fn update(&mut self, book_id: &str, book: &Book) -> Result<(), StoreError>;

    fn delete(&mut self, book_id: &str) -> Result<(), StoreError>;

    fn delete_all(&mut self) -> Result<(), StoreError>;
}

/// SQLite-backed catalog. Owns the single connection for the process
/// lifetime; statements run in autocommit mode.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_database(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_in_memory_database()?,
        })
    }
}

impl CatalogStore for SqliteCatalog {
    fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        fetch_books(&self.conn)
    }

    fn find(&self, book_id: &str) -> Result<Option<Book>, StoreError> {
        find_book(&self.conn, book_id)
    }

    fn insert(&mut self, book: &Book) -> Result<(), StoreError> {
        insert_book(&self.conn, book)
    }

    fn update(&mut self, book_id: &str, book: &Book) -> Result<(), StoreError> {
        update_book(&self.conn, book_id, book)
    }

    fn delete(&mut self, book_id: &str) -> Result<(), StoreError> {
        delete_book(&self.conn, book_id)
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        delete_all_books(&self.conn)
    }
}
