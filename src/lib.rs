//! Core library surface for the Library Inventory TUI application.
//!
//! The catalog store and the checkout workflow are usable without the
//! terminal front-end, which is how the tests drive them.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;
pub mod workflow;

/// Convenience re-exports for the persistence layer.
pub use db::{CatalogStore, SqliteCatalog};

pub use error::{StoreError, WorkflowError};

/// The domain types that other layers manipulate.
pub use models::{Book, BookStatus, ISSUER_SENTINEL};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

pub use workflow::{CheckoutWorkflow, Prompter};
