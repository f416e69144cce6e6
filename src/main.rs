//! Binary entry point: resolve the data paths, start logging, open the
//! catalog, and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use library_inventory::config::AppPaths;
use library_inventory::{logging, run_app, App, CheckoutWorkflow, SqliteCatalog};
use tracing::info;

/// Fatal initialization problems (unwritable data directory, unreadable
/// database) bubble up to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    logging::init(&paths.log_path)?;
    info!(db = %paths.db_path.display(), "starting library inventory");

    let catalog = SqliteCatalog::open(&paths.db_path)
        .with_context(|| format!("failed to open {}", paths.db_path.display()))?;
    let mut app = App::new(CheckoutWorkflow::new(catalog))?;
    run_app(&mut app)
}
