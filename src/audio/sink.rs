//! Utilities for creating `rodio` sinks from cached track audio.
//!
//! The helper here encapsulates decoding the in-memory bytes and preparing a
//! paused `Sink` at the requested start position.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackError;

/// Decode `bytes` far enough to learn the total duration, if the format reports one.
pub(super) fn read_duration(bytes: &Arc<[u8]>) -> Result<Option<Duration>, PlaybackError> {
    let decoder = Decoder::new(Cursor::new(bytes.clone()))
        .map_err(|e| PlaybackError::Decode(e.to_string()))?;
    Ok(decoder.total_duration())
}

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &Arc<[u8]>,
    start_at: Duration,
) -> Result<Sink, PlaybackError> {
    let source = Decoder::new(Cursor::new(bytes.clone()))
        .map_err(|e| PlaybackError::Decode(e.to_string()))?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
