//! Playback session management.
//!
//! [`PlaybackSession`] owns the per-track [`PlaybackState`] map and the audio
//! resources, and enforces that at most one track plays at a time. The
//! presentation layer only reads snapshots and issues commands.

mod manager;
mod poll;
mod state;

pub use manager::PlaybackSession;
pub use state::PlaybackState;
