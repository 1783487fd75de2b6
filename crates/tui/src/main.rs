mod app;
mod events;
mod logging;
mod persist;
mod strings;
mod terminal;
mod theme;
mod ui;

use anyhow::{Context, Result};
use providers::algolia::SearchConfig;
use terminal::TerminalGuard;
use tracing::info;

fn main() -> Result<()> {
    let _log_guard = logging::init();
    let cfg = SearchConfig::from_env_and_file().context("load search config")?;
    info!(target: "tui", "start endpoint={} default_term={}", cfg.endpoint, cfg.default_term);
    let store = persist::JsonFileStore::open_default()?;
    let mut app = app::App::new(cfg, Box::new(store))?;
    let mut term = TerminalGuard::new()?;
    events::run(&mut term.terminal, &mut app)
}
