//! `rodio`-backed implementation of [`AudioResource`].
//!
//! Audio is downloaded once through the shared [`BlobStore`] on a fetch thread
//! and decoded from memory. The decoded blob is handed back over a private
//! channel before the session is told the resource is loaded. Seeking rebuilds
//! the sink at the new offset.

use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::catalog::TrackMetadata;
use crate::error::PlaybackError;

use super::cache::{BlobFetcher, BlobStore};
use super::clock::{PlayClock, position_from_secs};
use super::sink::{create_sink_at, read_duration};
use super::types::{AudioResource, ResourceFactory, ResourceNotifier};

type Blob = (Arc<[u8]>, Option<Duration>);

/// Owns the output device and hands out one [`RodioResource`] per track.
pub struct RodioFactory<F> {
    stream: Rc<OutputStream>,
    store: BlobStore<F>,
}

impl<F: BlobFetcher> RodioFactory<F> {
    pub fn new(store: BlobStore<F>) -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Output(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which tears through the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream: Rc::new(stream),
            store,
        })
    }
}

impl<F: BlobFetcher + 'static> ResourceFactory for RodioFactory<F> {
    type Resource = RodioResource<F>;

    fn open(
        &mut self,
        track: &TrackMetadata,
        notifier: ResourceNotifier,
    ) -> Result<Self::Resource, PlaybackError> {
        debug!(
            "opening resource for {} (cached: {})",
            track.id,
            self.store.contains(&track.url)
        );
        Ok(RodioResource {
            stream: self.stream.clone(),
            store: self.store.clone(),
            notifier,
            incoming: None,
            bytes: None,
            sink: None,
            duration: None,
            clock: PlayClock::default(),
            volume: 1.0,
        })
    }
}

pub struct RodioResource<F> {
    stream: Rc<OutputStream>,
    store: BlobStore<F>,
    notifier: ResourceNotifier,
    incoming: Option<Receiver<Blob>>,
    bytes: Option<Arc<[u8]>>,
    sink: Option<Sink>,
    duration: Option<Duration>,
    clock: PlayClock,
    volume: f32,
}

impl<F> RodioResource<F> {
    /// Take the blob a finished fetch thread left for us, if any.
    fn receive_blob(&mut self) {
        let received = self.incoming.as_ref().and_then(|rx| rx.try_recv().ok());
        if let Some((bytes, duration)) = received {
            self.bytes = Some(bytes);
            self.duration = duration;
            self.incoming = None;
        }
    }

    fn rebuild_sink(&mut self, bytes: &Arc<[u8]>) -> Result<(), PlaybackError> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = create_sink_at(&self.stream, bytes, self.clock.accumulated())?;
        sink.set_volume(self.volume);
        self.sink = Some(sink);
        Ok(())
    }
}

fn fetch_and_measure<F: BlobFetcher>(
    store: &BlobStore<F>,
    url: &str,
) -> Result<Blob, PlaybackError> {
    let bytes = store.get_or_fetch(url)?;
    let duration = read_duration(&bytes)?;
    Ok((bytes, duration))
}

impl<F: BlobFetcher + 'static> AudioResource for RodioResource<F> {
    fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.bytes = None;
        self.duration = None;
        self.clock = PlayClock::default();

        let (tx, rx) = mpsc::channel();
        self.incoming = Some(rx);

        let store = self.store.clone();
        let notifier = self.notifier.clone();
        let url = url.to_string();
        thread::spawn(move || match fetch_and_measure(&store, &url) {
            Ok((bytes, duration)) => {
                // A closed channel means the resource was released meanwhile.
                if tx.send((bytes, duration)).is_ok() {
                    if duration.is_none() {
                        debug!("{} does not report a duration", notifier.track());
                    }
                    notifier.loaded(duration.map(|d| d.as_secs_f64()));
                }
            }
            Err(e) => {
                warn!("loading {url} failed: {e}");
                notifier.failed(e);
            }
        });
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.receive_blob();
        let Some(bytes) = self.bytes.clone() else {
            return Err(PlaybackError::Start("audio has not finished loading".to_string()));
        };
        if self.sink.is_none() {
            self.rebuild_sink(&bytes)?;
        }
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
        self.clock.start_at(Instant::now());
        Ok(())
    }

    fn pause(&mut self) {
        self.clock.pause_at(Instant::now());
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.receive_blob();
        let position = position_from_secs(seconds, self.duration);
        let running = self.clock.is_running();
        self.clock.seek_at(position, Instant::now());

        // Nothing decoded yet; the position applies when the sink is built.
        if self.sink.is_none() {
            return;
        }
        let Some(bytes) = self.bytes.clone() else {
            return;
        };
        match self.rebuild_sink(&bytes) {
            Ok(()) => {
                if running {
                    if let Some(sink) = self.sink.as_ref() {
                        sink.play();
                    }
                }
            }
            Err(e) => {
                warn!("seek failed for {}: {e}", self.notifier.track());
                self.clock.pause_at(Instant::now());
                self.notifier.failed(e);
            }
        }
    }

    fn current_time(&self) -> f64 {
        self.clock
            .elapsed_at(Instant::now(), self.duration)
            .as_secs_f64()
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(level);
        }
    }

    fn check_ended(&mut self) {
        let drained = self.sink.as_ref().is_some_and(|s| s.empty());
        if self.clock.is_running() && drained {
            // Stop the clock so a later seek does not restart output.
            self.clock.pause_at(Instant::now());
            debug!("{} ran dry", self.notifier.track());
            self.notifier.ended();
        }
    }
}

impl<F> Drop for RodioResource<F> {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
