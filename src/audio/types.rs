//! Audio-related small types and the resource capability traits.
//!
//! A resource is one seekable/playable handle to a track's audio. The session
//! drives resources through [`AudioResource`] and learns about asynchronous
//! happenings (load completion, end of stream, late failures) through
//! [`SessionEvent`]s sent by a [`ResourceNotifier`].

use std::sync::mpsc::Sender;

use crate::catalog::{TrackId, TrackMetadata};
use crate::error::PlaybackError;

/// Events delivered to the thread that owns the playback session.
///
/// Resource notifications carry the catalog generation they were issued
/// under, so the session can drop the ones a refresh has made stale.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Periodic progress poll fired.
    Tick,
    /// A resource finished loading and can play. `duration` is in seconds
    /// when the format reports one.
    Loaded {
        track: TrackId,
        generation: u64,
        duration: Option<f64>,
    },
    /// A resource reached end of stream.
    Ended { track: TrackId, generation: u64 },
    /// A resource failed while loading or after `play` had returned.
    Failed {
        track: TrackId,
        generation: u64,
        error: PlaybackError,
    },
}

/// Handle a resource uses to report notifications for its own track.
#[derive(Debug, Clone)]
pub struct ResourceNotifier {
    track: TrackId,
    generation: u64,
    tx: Sender<SessionEvent>,
}

impl ResourceNotifier {
    pub fn new(track: TrackId, generation: u64, tx: Sender<SessionEvent>) -> Self {
        Self {
            track,
            generation,
            tx,
        }
    }

    pub fn track(&self) -> &TrackId {
        &self.track
    }

    // Send failures mean the session is gone; there is nobody left to tell.
    pub fn loaded(&self, duration: Option<f64>) {
        let _ = self.tx.send(SessionEvent::Loaded {
            track: self.track.clone(),
            generation: self.generation,
            duration,
        });
    }

    pub fn ended(&self) {
        let _ = self.tx.send(SessionEvent::Ended {
            track: self.track.clone(),
            generation: self.generation,
        });
    }

    pub fn failed(&self, error: PlaybackError) {
        let _ = self.tx.send(SessionEvent::Failed {
            track: self.track.clone(),
            generation: self.generation,
            error,
        });
    }
}

/// A single streamable, seekable audio resource.
pub trait AudioResource {
    /// Begin loading `url` without blocking. Completion is reported through
    /// the notifier: `loaded` once the resource can play, or `failed`.
    /// An `Err` here means loading could not even begin.
    fn load(&mut self, url: &str) -> Result<(), PlaybackError>;
    /// Start or resume output. Only called after `loaded` was reported.
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn set_current_time(&mut self, seconds: f64);
    fn current_time(&self) -> f64;
    fn set_volume(&mut self, level: f32);
    /// Called on every progress tick while playing, for backends that cannot
    /// push end of stream on their own. Reports `ended` through the notifier.
    fn check_ended(&mut self) {}
}

/// Creates resources on demand, one per track.
pub trait ResourceFactory {
    type Resource: AudioResource;

    fn open(
        &mut self,
        track: &TrackMetadata,
        notifier: ResourceNotifier,
    ) -> Result<Self::Resource, PlaybackError>;
}
