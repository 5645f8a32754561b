use crate::error::CatalogFetchError;

use super::model::TrackMetadata;

/// Anything that can produce the current list of tracks.
pub trait CatalogSource {
    fn fetch(&self) -> Result<Vec<TrackMetadata>, CatalogFetchError>;
}

/// Keep at most `max_results` tracks, newest first.
///
/// The sort is stable so records sharing a timestamp keep the host's order.
pub fn normalize(mut tracks: Vec<TrackMetadata>, max_results: usize) -> Vec<TrackMetadata> {
    tracks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tracks.truncate(max_results);
    tracks
}
