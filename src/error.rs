//! Error types shared by the catalog, session and upload subsystems.

use thiserror::Error;

use crate::catalog::TrackId;

/// The track catalog could not be fetched or decoded.
#[derive(Debug, Error)]
pub enum CatalogFetchError {
    #[error("catalog request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("catalog responded with status {0}")]
    Status(u16),

    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

/// A single track's resource failed to load, start or keep playing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("failed to fetch audio: {0}")]
    Fetch(String),

    #[error("failed to decode audio: {0}")]
    Decode(String),

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("playback could not start: {0}")]
    Start(String),
}

/// A caller passed an argument outside the command's domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("track {0} is not in the current catalog")]
    UnknownTrack(TrackId),

    #[error("volume {0} is outside 0.0..=1.0")]
    VolumeOutOfRange(f32),

    #[error("position {0} is not a finite number of seconds")]
    InvalidPosition(f64),
}

/// Result of a session command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}
