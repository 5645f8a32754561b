use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::config::{self, LoggingSettings};

/// Route `log` output to a file, since the TUI owns the terminal.
///
/// `RUST_LOG` overrides `logging.level`. Returns the path being written to.
pub fn init(settings: &LoggingSettings) -> io::Result<PathBuf> {
    let path = settings
        .file
        .clone()
        .or_else(config::default_log_path)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no log directory available"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::from_env(Env::default().default_filter_or(settings.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(io::Error::other)?;

    Ok(path)
}
