//! Application model types: `App` and `CatalogStatus`.
//!
//! The `App` struct holds presentation-only state: cursor position, catalog
//! load status and the last status line. Playback state lives in the session.

/// Where the catalog listing stands, as shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    #[default]
    Loading,
    Ready,
    /// The last fetch failed; the message is shown next to a retry hint.
    Failed(String),
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub selected: usize,
    pub catalog: CatalogStatus,
    pub status: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the catalog as loaded with `len` tracks and keep the cursor in range.
    pub fn catalog_loaded(&mut self, len: usize) {
        self.catalog = CatalogStatus::Ready;
        self.clamp_selection(len);
    }

    /// Record a failed catalog fetch. The previous listing, if any, stays visible.
    pub fn catalog_failed(&mut self, message: String) {
        self.catalog = CatalogStatus::Failed(message);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if self.selected == 0 {
            len - 1
        } else {
            self.selected - 1
        };
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    fn clamp_selection(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
