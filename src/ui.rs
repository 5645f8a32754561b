//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It only
//! reads the session; every change goes through the event loop.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, CatalogStatus};
use crate::audio::ResourceFactory;
use crate::catalog::{CatalogSource, TrackMetadata, format_date, format_size, format_time};
use crate::config::ControlsSettings;
use crate::session::{PlaybackSession, PlaybackState};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("g/G", "top/bottom");
    map.insert("enter/space", "play/pause");
    // h/l is filled dynamically from config.
    map.insert("+/-", "volume");
    map.insert("m", "mute");
    map.insert("r", "reload");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating skip seconds.
fn controls_text(skip_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "enter/space", "h/l", "+/-", "m", "g/G", "r", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "h/l" {
                Some(format!("[h/l] skip -/+{}s", skip_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn volume_text(volume: f32, muted: bool) -> String {
    if muted {
        "Volume: muted".to_string()
    } else {
        format!("Volume: {}%", (volume * 100.0).round() as u32)
    }
}

/// Elapsed and total time of a track, `-` until its media is loaded.
fn time_text(state: &PlaybackState) -> String {
    if !state.is_loaded {
        return "-".to_string();
    }
    if state.duration > 0.0 {
        format!(
            "{} / {}",
            format_time(state.current_time),
            format_time(state.duration)
        )
    } else {
        format_time(state.current_time)
    }
}

/// Leading marker for a row: loading, playing, paused mid-track or idle.
fn marker(state: Option<&PlaybackState>) -> &'static str {
    match state {
        Some(s) if s.is_loading => "… ",
        Some(s) if s.is_playing => "▶ ",
        Some(s) if s.current_time > 0.0 => "‖ ",
        _ => "  ",
    }
}

fn track_line<'a, C, F>(track: &'a TrackMetadata, session: &PlaybackSession<C, F>) -> Line<'a>
where
    C: CatalogSource,
    F: ResourceFactory,
{
    let state = session.state(&track.id);

    let mut spans = vec![
        Span::raw(marker(state)),
        Span::raw(track.display_name()),
        Span::styled(
            format!(
                "  {} · {}",
                format_date(&track.created_at),
                format_size(track.size)
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(s) = state {
        spans.push(Span::raw(format!("  {}", time_text(s))));
    }
    if let Some(err) = session.track_error(&track.id) {
        spans.push(Span::styled(
            format!("  [{}]", err),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

/// Render the entire UI into the provided `frame` using `app` and `session`.
pub fn draw<C, F>(
    frame: &mut Frame,
    app: &App,
    session: &PlaybackSession<C, F>,
    controls_settings: &ControlsSettings,
) where
    C: CatalogSource,
    F: ResourceFactory,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new("Your music library")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" soundshelf ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        match &app.catalog {
            CatalogStatus::Loading => parts.push("Loading audios...".to_string()),
            CatalogStatus::Ready => parts.push(format!("{} tracks", session.tracks().len())),
            CatalogStatus::Failed(msg) => {
                parts.push(format!("Something went wrong: {msg}. Press r to retry"))
            }
        }

        if let Some(track) = session.playing().and_then(|id| session.track(id)) {
            let pct = session
                .state(&track.id)
                .map_or(0.0, |s| s.progress() * 100.0)
                .round();
            parts.push(format!("Playing: {} ({pct}%)", track.display_name()));
        } else if let Some(track) = session.pending().and_then(|id| session.track(id)) {
            parts.push(format!("Loading: {}", track.display_name()));
        }
        parts.push(volume_text(session.volume(), session.is_muted()));

        if let Some(msg) = &app.status {
            parts.push(msg.clone());
        }

        parts.join(" • ")
    };

    let status_style = if matches!(app.catalog, CatalogStatus::Failed(_)) {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let status_par = Paragraph::new(status)
        .style(status_style)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        let tracks = session.tracks();
        if tracks.is_empty() {
            let text = match app.catalog {
                CatalogStatus::Ready => "No audios found",
                _ => "",
            };
            let empty = Paragraph::new(text)
                .alignment(Alignment::Center)
                .italic()
                .block(Block::default().borders(Borders::ALL).title(" tracks "));
            frame.render_widget(empty, chunks[2]);
        } else {
            // Center the selected item when possible by creating a visible window.
            let total = tracks.len();
            let list_height = chunks[2].height.saturating_sub(2) as usize;
            let sel_pos = app.selected.min(total - 1);
            let (start, end, selected_pos_in_visible) =
                if total <= list_height || list_height == 0 {
                    (0, total, sel_pos)
                } else {
                    let half = list_height / 2;
                    let mut start = sel_pos.saturating_sub(half);
                    if start + list_height > total {
                        start = total - list_height;
                    }
                    (start, start + list_height, sel_pos - start)
                };

            let visible_items: Vec<ListItem> = tracks[start..end]
                .iter()
                .map(|t| ListItem::new(track_line(t, session)))
                .collect();

            let list = List::new(visible_items)
                .block(Block::default().borders(Borders::ALL).title(" tracks "))
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ratatui::widgets::ListState::default();
            state.select(Some(selected_pos_in_visible));
            frame.render_stateful_widget(list, chunks[2], &mut state);
        }
    }

    let footer_text = controls_text(controls_settings.skip_seconds);
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_text_includes_skip_seconds_in_order() {
        let text = controls_text(15);
        assert!(text.starts_with("[j/k] up/down | [enter/space] play/pause | [h/l] skip -/+15s"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn volume_text_shows_percent_or_muted() {
        assert_eq!(volume_text(0.7, false), "Volume: 70%");
        assert_eq!(volume_text(0.0, true), "Volume: muted");
    }

    #[test]
    fn time_text_waits_for_metadata() {
        let mut state = PlaybackState::new(1.0);
        assert_eq!(time_text(&state), "-");

        state.is_loaded = true;
        state.current_time = 65.0;
        assert_eq!(time_text(&state), "1:05");

        state.duration = 180.0;
        assert_eq!(time_text(&state), "1:05 / 3:00");
    }

    #[test]
    fn marker_shows_loading_before_playing() {
        let mut state = PlaybackState::new(1.0);
        assert_eq!(marker(None), "  ");
        assert_eq!(marker(Some(&state)), "  ");

        state.is_loading = true;
        assert_eq!(marker(Some(&state)), "… ");

        state.is_loading = false;
        state.is_playing = true;
        assert_eq!(marker(Some(&state)), "▶ ");

        state.is_playing = false;
        state.current_time = 12.0;
        assert_eq!(marker(Some(&state)), "‖ ");
    }
}
