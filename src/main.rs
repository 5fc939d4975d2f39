use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use kanboard::cli::Cli;
use kanboard::{logging, ui, App, FileStore};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir();
    logging::init_logging(&cli.log_target(), cli.verbose)?;

    let store = FileStore::open(&data_dir)
        .with_context(|| format!("opening data directory {}", data_dir.display()))?;
    tracing::info!(data_dir = %store.dir().display(), "starting kanboard");
    let mut app = App::load(store);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(%err, "terminal loop failed");
    }
    result.context("running terminal UI")
}
