use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Stable identifier of a track, as assigned by the media host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One audio asset as listed by the catalog proxy.
///
/// Wire form: `{ url, public_id, created_at, name, size }`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackMetadata {
    #[serde(rename = "public_id")]
    pub id: TrackId,
    #[serde(default)]
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub size: u64,
}

impl TrackMetadata {
    /// Name to show for this track; falls back to the id when the host sent none.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            self.id.as_str()
        } else {
            name
        }
    }
}
