//! Ratatui front-end: an entry form over an inventory table, with modal
//! dialogs that double as the workflow's prompter.

mod app;
mod dialogs;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
