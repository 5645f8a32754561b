//! Catalog source backed by the music host's listing proxy.

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::Client;

use crate::config::CatalogSettings;
use crate::error::CatalogFetchError;

use super::model::TrackMetadata;
use super::source::{CatalogSource, normalize};

pub struct HttpCatalog {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl HttpCatalog {
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogFetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(CatalogFetchError::Transport)?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            max_results: settings.max_results,
        })
    }
}

impl CatalogSource for HttpCatalog {
    fn fetch(&self) -> Result<Vec<TrackMetadata>, CatalogFetchError> {
        debug!("fetching catalog from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(CatalogFetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!("catalog endpoint answered {status}");
            return Err(CatalogFetchError::Status(status.as_u16()));
        }

        let body = response.text().map_err(CatalogFetchError::Transport)?;
        let tracks = parse_tracks(&body, self.max_results)?;
        info!("catalog lists {} tracks", tracks.len());
        Ok(tracks)
    }
}

/// Decode a catalog response body into newest-first track metadata.
pub fn parse_tracks(
    body: &str,
    max_results: usize,
) -> Result<Vec<TrackMetadata>, CatalogFetchError> {
    let tracks: Vec<TrackMetadata> =
        serde_json::from_str(body).map_err(|e| CatalogFetchError::Decode(e.to_string()))?;
    Ok(normalize(tracks, max_results))
}
