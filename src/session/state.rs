/// The session's knowledge of one track's playback.
///
/// `duration` stays at 0 until the resource reports it has loaded; a track
/// whose audio is still downloading has `is_loading` set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_time: f64,
    pub duration: f64,
    pub volume: f32,
    pub is_playing: bool,
    pub is_loaded: bool,
    pub is_loading: bool,
}

impl PlaybackState {
    pub fn new(volume: f32) -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            volume,
            is_playing: false,
            is_loaded: false,
            is_loading: false,
        }
    }

    /// Clamp `seconds` into the playable range of this track.
    ///
    /// The upper bound only applies once a positive duration is known.
    pub fn clamp_position(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        if self.is_loaded && self.duration > 0.0 {
            seconds.min(self.duration)
        } else {
            seconds
        }
    }

    /// Playback progress as a fraction of the duration, 0 when unknown.
    pub fn progress(&self) -> f64 {
        if self.is_loaded && self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
