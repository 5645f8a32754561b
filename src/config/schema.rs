use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/soundshelf/config.toml` or
/// `~/.config/soundshelf/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SOUNDSHELF__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub cache: CacheSettings,
    pub upload: UploadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// URL of the catalog listing proxy.
    pub endpoint: String,
    /// Maximum number of tracks kept from one listing.
    pub max_results: usize,
    /// Request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/audios".to_string(),
            max_results: 50,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Session volume at startup, 0.0 to 1.0.
    pub initial_volume: f32,
    /// Interval between progress updates while a track plays (milliseconds).
    pub progress_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            progress_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to skip when pressing `h` / `l`.
    pub skip_seconds: u64,
    /// Volume change applied by `+` / `-`.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            skip_seconds: 10,
            volume_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Upper bound on downloaded audio kept in memory (bytes).
    pub max_bytes: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_bytes: 256 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Media host account that receives uploads.
    pub cloud_name: String,
    /// Unsigned upload preset configured on the media host.
    pub upload_preset: String,
    /// Largest accepted file (mebibytes).
    pub max_file_size_mb: u64,
    /// MIME types accepted for upload.
    pub allowed_types: Vec<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            upload_preset: "audios".to_string(),
            max_file_size_mb: 20,
            allowed_types: vec![
                "audio/mpeg".into(),
                "audio/wav".into(),
                "audio/mp3".into(),
                "audio/ogg".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/soundshelf/soundshelf.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
