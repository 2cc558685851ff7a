mod app;
mod collection;
mod config;
mod models;
mod seed;
mod store;
mod ui;
mod view;

use crate::app::App;
use crate::config::Config;
use crate::store::MailboxStore;
use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::sync::Mutex;
use tracing::info;

const DEBUG_LOG_FILE: &str = "mailbox_debug.log";

fn init_logging() -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(DEBUG_LOG_FILE)
        .with_context(|| format!("Failed to open {}", DEBUG_LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // The terminal belongs to the UI, so logs only ever go to a file
    if std::env::args().any(|arg| arg == "--debug") {
        init_logging()?;
    }

    let config = Config::load();
    let messages = seed::messages().context("Failed to decode seed messages")?;
    let store = MailboxStore::new(messages, config.identity.address.clone());
    info!(
        "Starting mailbox with {} messages",
        store.emails().iter().count()
    );
    let mut app = App::new(store, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    info!("Exiting mailbox");
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App<'_>) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| app.draw(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}
