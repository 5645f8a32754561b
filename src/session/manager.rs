//! The playback session: one authoritative state map, many resources, at most
//! one playing track.
//!
//! Every method runs to completion on the owning thread. Mutual exclusion of
//! playback is kept purely by ordering: the previous track is paused before
//! the next one is asked to play. Resources load in the background; a track
//! asked to play before its audio is ready becomes the pending start and
//! begins when its `Loaded` notification arrives.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::audio::{AudioResource, ResourceFactory, ResourceNotifier, SessionEvent};
use crate::catalog::{CatalogSource, TrackId, TrackMetadata};
use crate::config::PlaybackSettings;
use crate::error::{CatalogFetchError, PlaybackError, SessionError, ValidationError};

use super::poll::ProgressPoll;
use super::state::PlaybackState;

pub struct PlaybackSession<C, F: ResourceFactory> {
    catalog: C,
    factory: F,
    events: Sender<SessionEvent>,
    poll_interval: Duration,
    // Bumped whenever resources are released; older notifications are dropped.
    generation: u64,

    tracks: Vec<TrackMetadata>,
    states: HashMap<TrackId, PlaybackState>,
    resources: HashMap<TrackId, F::Resource>,
    errors: HashMap<TrackId, PlaybackError>,

    playing: Option<TrackId>,
    // Asked to play while still loading.
    pending: Option<TrackId>,
    volume: f32,
    // Last non-zero volume, restored by unmute.
    unmute_volume: f32,
    poll: Option<ProgressPoll>,
}

impl<C: CatalogSource, F: ResourceFactory> PlaybackSession<C, F> {
    /// Create an empty session. Resource notifications and progress ticks are
    /// sent to `events`; the owner feeds them back through [`Self::handle_event`].
    pub fn new(
        catalog: C,
        factory: F,
        events: Sender<SessionEvent>,
        settings: &PlaybackSettings,
    ) -> Self {
        let volume = settings.initial_volume.clamp(0.0, 1.0);
        Self {
            catalog,
            factory,
            events,
            poll_interval: Duration::from_millis(settings.progress_interval_ms.max(1)),
            generation: 0,
            tracks: Vec::new(),
            states: HashMap::new(),
            resources: HashMap::new(),
            errors: HashMap::new(),
            playing: None,
            pending: None,
            volume,
            unmute_volume: if volume > 0.0 { volume } else { 1.0 },
            poll: None,
        }
    }

    /// Fetch the catalog and replace the track list.
    ///
    /// On success every track starts from a fresh state and all held
    /// resources are released. On failure nothing changes.
    pub fn load_catalog(&mut self) -> Result<&[TrackMetadata], CatalogFetchError> {
        let tracks = self.catalog.fetch().inspect_err(|e| {
            warn!("catalog fetch failed: {e}");
        })?;

        self.close();
        self.states = tracks
            .iter()
            .map(|t| (t.id.clone(), PlaybackState::new(self.volume)))
            .collect();
        self.errors.clear();
        self.tracks = tracks;

        info!("catalog loaded with {} tracks", self.tracks.len());
        Ok(&self.tracks)
    }

    /// Start `id`, pausing whatever else was playing first.
    ///
    /// A track whose audio is not ready yet starts loading and plays once it
    /// has loaded. Asking again for the playing or pending track does nothing.
    pub fn play(&mut self, id: &TrackId) -> Result<(), SessionError> {
        self.require_known(id)?;
        if self.playing.as_ref() == Some(id) || self.pending.as_ref() == Some(id) {
            return Ok(());
        }

        if let Some(current) = self.playing.clone() {
            self.pause_playing(&current);
        }
        self.pending = None;

        if self.is_ready(id) {
            if let Err(e) = self.start(id) {
                warn!("{id} failed to start: {e}");
                self.record_failure(id, e.clone());
                return Err(e.into());
            }
            info!("playing {id}");
        } else {
            if !self.resources.contains_key(id) {
                if let Err(e) = self.open(id) {
                    warn!("{id} could not be opened: {e}");
                    self.record_failure(id, e.clone());
                    return Err(e.into());
                }
            }
            self.errors.remove(id);
            self.pending = Some(id.clone());
            debug!("{id} starts once loaded");
        }

        debug_assert!(self.states.values().filter(|s| s.is_playing).count() <= 1);
        debug_assert_eq!(self.is_polling(), self.playing.is_some());
        Ok(())
    }

    /// Pause `id` if it is the playing track, or cancel its pending start;
    /// otherwise a no-op.
    pub fn pause(&mut self, id: &TrackId) -> Result<(), ValidationError> {
        self.require_known(id)?;
        if self.pending.as_ref() == Some(id) {
            self.pending = None;
            info!("cancelled start of {id}");
        }
        if self.playing.as_ref() == Some(id) {
            self.pause_playing(id);
            info!("paused {id}");
        }
        Ok(())
    }

    /// Pause `id` when it is playing or about to, play it otherwise.
    pub fn toggle(&mut self, id: &TrackId) -> Result<(), SessionError> {
        if self.playing.as_ref() == Some(id) || self.pending.as_ref() == Some(id) {
            self.pause(id)?;
            Ok(())
        } else {
            self.play(id)
        }
    }

    /// Move `id` to `seconds`, clamped into `[0, duration]`.
    pub fn seek(&mut self, id: &TrackId, seconds: f64) -> Result<(), ValidationError> {
        if !seconds.is_finite() {
            return Err(ValidationError::InvalidPosition(seconds));
        }
        let state = self
            .states
            .get_mut(id)
            .ok_or_else(|| ValidationError::UnknownTrack(id.clone()))?;

        let target = state.clamp_position(seconds);
        state.current_time = target;
        if let Some(resource) = self.resources.get_mut(id) {
            resource.set_current_time(target);
        }
        debug!("{id} seeked to {target:.1}s");
        Ok(())
    }

    /// Seek `id` by `delta` seconds relative to its current position.
    pub fn skip(&mut self, id: &TrackId, delta: f64) -> Result<(), ValidationError> {
        self.require_known(id)?;
        if !delta.is_finite() {
            return Err(ValidationError::InvalidPosition(delta));
        }
        let current = self.live_position(id);
        self.seek(id, current + delta)
    }

    /// Set the session volume on every resource and every track state.
    pub fn set_volume(&mut self, level: f32) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&level) {
            return Err(ValidationError::VolumeOutOfRange(level));
        }
        self.apply_volume(level);
        Ok(())
    }

    /// Mute, remembering the current level, or restore the remembered level.
    pub fn toggle_mute(&mut self) {
        if self.is_muted() {
            self.apply_volume(self.unmute_volume);
        } else {
            self.unmute_volume = self.volume;
            self.apply_volume(0.0);
        }
    }

    /// `id`'s resource has loaded; record its duration and start it if it is
    /// the pending track.
    pub fn on_resource_loaded(&mut self, id: &TrackId, duration: f64) {
        let Some(state) = self.states.get_mut(id) else {
            debug!("load notification for unknown track {id} ignored");
            return;
        };
        apply_loaded(state, duration);
        state.is_loading = false;

        if self.pending.as_ref() != Some(id) {
            return;
        }
        self.pending = None;
        if let Some(current) = self.playing.clone() {
            self.pause_playing(&current);
        }
        match self.start(id) {
            Ok(()) => info!("playing {id}"),
            Err(e) => {
                warn!("{id} failed to start: {e}");
                self.record_failure(id, e);
            }
        }
    }

    /// `id` reached end of stream: stop its output, rewind it and clear it as
    /// the playing track.
    pub fn on_resource_ended(&mut self, id: &TrackId) {
        if !self.states.contains_key(id) {
            return;
        }
        if let Some(resource) = self.resources.get_mut(id) {
            resource.pause();
        }
        if let Some(state) = self.states.get_mut(id) {
            state.is_playing = false;
            state.current_time = 0.0;
        }

        if self.playing.as_ref() == Some(id) {
            self.playing = None;
            self.poll = None;
        }
        info!("{id} finished");
    }

    /// Progress report for `id`; ignored unless `id` is the playing track.
    pub fn on_progress(&mut self, id: &TrackId, current_time: f64) {
        if self.playing.as_ref() != Some(id) {
            trace!("stale progress for {id} ignored");
            return;
        }
        if !current_time.is_finite() {
            return;
        }
        if let Some(state) = self.states.get_mut(id) {
            state.current_time = state.clamp_position(current_time);
        }
    }

    /// A resource failed while loading or after `play` returned.
    pub fn on_resource_error(&mut self, id: &TrackId, error: PlaybackError) {
        warn!("{id} stopped with an error: {error}");
        if self.pending.as_ref() == Some(id) {
            self.pending = None;
        }

        let never_loaded = self.states.get(id).is_some_and(|s| s.is_loading);
        if never_loaded {
            // Drop the half-built resource so the next play starts over.
            self.resources.remove(id);
            if let Some(state) = self.states.get_mut(id) {
                state.is_loading = false;
            }
        } else if let Some(resource) = self.resources.get_mut(id) {
            resource.pause();
        }
        self.record_failure(id, error);
    }

    /// Report progress for the playing track and let its resource check for
    /// end of stream.
    pub fn poll_progress(&mut self) {
        let Some(id) = self.playing.clone() else {
            return;
        };
        let Some(resource) = self.resources.get_mut(&id) else {
            return;
        };

        resource.check_ended();
        let t = resource.current_time();
        self.on_progress(&id, t);
    }

    /// Dispatch a notification or tick received on the session's channel.
    pub fn handle_event(&mut self, event: SessionEvent) {
        let current = self.generation;
        match event {
            SessionEvent::Tick => self.poll_progress(),
            SessionEvent::Loaded {
                track,
                generation,
                duration,
            } if generation == current => {
                self.on_resource_loaded(&track, duration.unwrap_or(0.0))
            }
            SessionEvent::Ended { track, generation } if generation == current => {
                self.on_resource_ended(&track)
            }
            SessionEvent::Failed {
                track,
                generation,
                error,
            } if generation == current => self.on_resource_error(&track, error),
            stale => debug!("dropping {stale:?} from a previous catalog"),
        }
    }

    pub fn tracks(&self) -> &[TrackMetadata] {
        &self.tracks
    }

    pub fn track(&self, id: &TrackId) -> Option<&TrackMetadata> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn state(&self, id: &TrackId) -> Option<&PlaybackState> {
        self.states.get(id)
    }

    pub fn playing(&self) -> Option<&TrackId> {
        self.playing.as_ref()
    }

    /// The track that will start as soon as its audio has loaded.
    pub fn pending(&self) -> Option<&TrackId> {
        self.pending.as_ref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.volume == 0.0
    }

    /// Last playback failure of `id`, cleared when it next starts.
    pub fn track_error(&self, id: &TrackId) -> Option<&PlaybackError> {
        self.errors.get(id)
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    fn require_known(&self, id: &TrackId) -> Result<(), ValidationError> {
        if self.states.contains_key(id) {
            Ok(())
        } else {
            Err(ValidationError::UnknownTrack(id.clone()))
        }
    }

    /// A resource is held and has finished loading.
    fn is_ready(&self, id: &TrackId) -> bool {
        self.resources.contains_key(id) && !self.states.get(id).is_some_and(|s| s.is_loading)
    }

    /// Open a resource for `id` and begin loading it in the background.
    fn open(&mut self, id: &TrackId) -> Result<(), PlaybackError> {
        let track = self
            .tracks
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| PlaybackError::Start(format!("{id} has no metadata")))?;

        let notifier = ResourceNotifier::new(id.clone(), self.generation, self.events.clone());
        let mut resource = self.factory.open(track, notifier)?;
        resource.load(&track.url)?;

        self.resources.insert(id.clone(), resource);
        if let Some(state) = self.states.get_mut(id) {
            state.is_loading = true;
        }
        Ok(())
    }

    fn start(&mut self, id: &TrackId) -> Result<(), PlaybackError> {
        let volume = self.volume;
        let position = self.states.get(id).map_or(0.0, |s| s.current_time);

        let resource = self
            .resources
            .get_mut(id)
            .ok_or_else(|| PlaybackError::Start(format!("{id} has no resource")))?;
        resource.set_volume(volume);
        resource.set_current_time(position);
        resource.play()?;

        if let Some(state) = self.states.get_mut(id) {
            state.is_playing = true;
        }
        self.errors.remove(id);
        self.playing = Some(id.clone());
        if self.poll.is_none() {
            self.poll = Some(ProgressPoll::start(self.poll_interval, self.events.clone()));
        }
        Ok(())
    }

    fn live_position(&self, id: &TrackId) -> f64 {
        let stored = self.states.get(id).map_or(0.0, |s| s.current_time);
        if self.playing.as_ref() != Some(id) {
            return stored;
        }
        self.resources
            .get(id)
            .map(|r| r.current_time())
            .filter(|t| t.is_finite())
            .unwrap_or(stored)
    }

    fn apply_volume(&mut self, level: f32) {
        self.volume = level;
        if level > 0.0 {
            self.unmute_volume = level;
        }
        for resource in self.resources.values_mut() {
            resource.set_volume(level);
        }
        for state in self.states.values_mut() {
            state.volume = level;
        }
        debug!("volume set to {level:.2}");
    }

    fn record_failure(&mut self, id: &TrackId, error: PlaybackError) {
        let Some(state) = self.states.get_mut(id) else {
            return;
        };
        state.is_playing = false;
        if self.playing.as_ref() == Some(id) {
            self.playing = None;
            self.poll = None;
        }
        self.errors.insert(id.clone(), error);
    }
}

impl<C, F: ResourceFactory> PlaybackSession<C, F> {
    fn pause_playing(&mut self, id: &TrackId) {
        if let Some(resource) = self.resources.get_mut(id) {
            resource.pause();
            let t = resource.current_time();
            if let Some(state) = self.states.get_mut(id) {
                if t.is_finite() {
                    state.current_time = state.clamp_position(t);
                }
            }
        }
        if let Some(state) = self.states.get_mut(id) {
            state.is_playing = false;
        }
        self.playing = None;
        self.poll = None;
    }

    /// Stop the progress poll and release every resource. Notifications the
    /// released resources still send are dropped.
    pub fn close(&mut self) {
        if let Some(id) = self.playing.clone() {
            self.pause_playing(&id);
        }
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
        self.poll = None;
        self.resources.clear();
        for state in self.states.values_mut() {
            state.is_loading = false;
        }
    }
}

impl<C, F: ResourceFactory> Drop for PlaybackSession<C, F> {
    fn drop(&mut self) {
        self.close();
    }
}

fn apply_loaded(state: &mut PlaybackState, duration: f64) {
    state.duration = if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    };
    state.is_loaded = true;
    state.current_time = state.clamp_position(state.current_time);
}
