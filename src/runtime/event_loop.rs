use std::io::Stdout;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::debug;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, CatalogStatus};
use crate::audio::{ResourceFactory, SessionEvent};
use crate::catalog::{CatalogSource, TrackId};
use crate::config;
use crate::error::SessionError;
use crate::session::PlaybackSession;
use crate::ui;

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// Main terminal event loop: drains session notifications, draws, and
/// handles input. Returns `Ok(())` when shutdown is requested.
pub fn run<C, F>(
    terminal: &mut Term,
    settings: &config::Settings,
    app: &mut App,
    session: &mut PlaybackSession<C, F>,
    events: &Receiver<SessionEvent>,
) -> Result<(), Box<dyn std::error::Error>>
where
    C: CatalogSource,
    F: ResourceFactory,
{
    loop {
        while let Ok(ev) = events.try_recv() {
            session.handle_event(ev);
        }

        terminal.draw(|f| ui::draw(f, app, session, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, terminal, settings, app, session)? {
                    break;
                }
            }
        }
    }

    session.close();
    Ok(())
}

/// Fetch the catalog, showing the loading state while the request runs.
pub fn reload_catalog<C, F>(
    terminal: &mut Term,
    settings: &config::Settings,
    app: &mut App,
    session: &mut PlaybackSession<C, F>,
) -> Result<(), Box<dyn std::error::Error>>
where
    C: CatalogSource,
    F: ResourceFactory,
{
    app.catalog = CatalogStatus::Loading;
    app.clear_status();
    terminal.draw(|f| ui::draw(f, app, session, &settings.controls))?;

    match session.load_catalog() {
        Ok(tracks) => {
            let len = tracks.len();
            app.catalog_loaded(len);
        }
        Err(e) => app.catalog_failed(e.to_string()),
    }
    Ok(())
}

fn handle_key_event<C, F>(
    key: KeyEvent,
    terminal: &mut Term,
    settings: &config::Settings,
    app: &mut App,
    session: &mut PlaybackSession<C, F>,
) -> Result<bool, Box<dyn std::error::Error>>
where
    C: CatalogSource,
    F: ResourceFactory,
{
    let len = session.tracks().len();
    let skip = settings.controls.skip_seconds as f64;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char('j') | KeyCode::Down => app.next(len),
        KeyCode::Char('k') | KeyCode::Up => app.prev(len),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(len),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => {
            if let Some(id) = selected_id(app, session) {
                let result = session.toggle(&id);
                report(app, session, &id, result);
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if let Some(id) = target_id(app, session) {
                let result = session.skip(&id, skip).map_err(SessionError::from);
                report(app, session, &id, result);
            }
        }
        KeyCode::Char('h') | KeyCode::Left => {
            if let Some(id) = target_id(app, session) {
                let result = session.skip(&id, -skip).map_err(SessionError::from);
                report(app, session, &id, result);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let level = (session.volume() + step).clamp(0.0, 1.0);
            if let Err(e) = session.set_volume(level) {
                app.set_status(e.to_string());
            }
        }
        KeyCode::Char('-') => {
            let level = (session.volume() - step).clamp(0.0, 1.0);
            if let Err(e) = session.set_volume(level) {
                app.set_status(e.to_string());
            }
        }
        KeyCode::Char('m') => session.toggle_mute(),
        KeyCode::Char('r') => reload_catalog(terminal, settings, app, session)?,
        _ => {}
    }

    Ok(false)
}

fn selected_id<C, F>(app: &App, session: &PlaybackSession<C, F>) -> Option<TrackId>
where
    C: CatalogSource,
    F: ResourceFactory,
{
    session.tracks().get(app.selected).map(|t| t.id.clone())
}

/// Seeking applies to the playing track, else to the selection.
fn target_id<C, F>(app: &App, session: &PlaybackSession<C, F>) -> Option<TrackId>
where
    C: CatalogSource,
    F: ResourceFactory,
{
    session.playing().cloned().or_else(|| selected_id(app, session))
}

fn report<C, F>(
    app: &mut App,
    session: &PlaybackSession<C, F>,
    id: &TrackId,
    result: Result<(), SessionError>,
) where
    C: CatalogSource,
    F: ResourceFactory,
{
    match result {
        Ok(()) => app.clear_status(),
        Err(e) => {
            debug!("command on {id} failed: {e}");
            let name = session.track(id).map_or(id.as_str(), |t| t.display_name());
            app.set_status(format!("{name}: {e}"));
        }
    }
}
