use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{BlobStore, HttpFetcher, RodioFactory, SessionEvent};
use crate::catalog::HttpCatalog;
use crate::cli::{Cli, Commands};
use crate::config;
use crate::session::PlaybackSession;

mod event_loop;
mod logging;
mod settings;
mod upload;

pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings(cli.config.as_deref());

    match logging::init(&settings.logging) {
        Ok(path) => info!("logging to {}", path.display()),
        Err(e) => eprintln!("soundshelf: logging disabled: {e}"),
    }

    match cli.command {
        Some(Commands::Upload { file }) => {
            upload::run(&file, &settings)?;
            Ok(())
        }
        Some(Commands::Play) | None => play(&settings),
    }
}

fn play(settings: &config::Settings) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = HttpCatalog::new(&settings.catalog)?;
    // Blob downloads keep reqwest's default 30s timeout.
    let client = reqwest::blocking::Client::builder().build()?;
    let store = BlobStore::new(HttpFetcher::new(client), settings.cache.max_bytes);
    let factory = RodioFactory::new(store)?;

    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>();
    let mut session = PlaybackSession::new(catalog, factory, event_tx, &settings.playback);
    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        event_loop::reload_catalog(&mut terminal, settings, &mut app, &mut session)?;
        event_loop::run(&mut terminal, settings, &mut app, &mut session, &event_rx)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        warn!("player exited with error: {e}");
    }
    run_result
}
