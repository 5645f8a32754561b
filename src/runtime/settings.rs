use std::path::Path;

use crate::config;

/// Load settings from `path` (or the resolved default), falling back to
/// defaults when the file is unreadable or fails validation.
pub fn load_settings(path: Option<&Path>) -> config::Settings {
    let loaded = match path {
        Some(p) => config::Settings::load_from(Some(p)),
        None => config::Settings::load(),
    };

    match loaded {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("soundshelf: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("soundshelf: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
