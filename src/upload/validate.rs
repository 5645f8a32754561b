use std::path::{Path, PathBuf};

use crate::config::UploadSettings;

use super::UploadError;

/// A local file that passed the type and size checks.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadCandidate {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
    pub size: u64,
}

/// Check that `path` is an allowed audio type within the size ceiling.
pub fn validate(path: &Path, settings: &UploadSettings) -> Result<UploadCandidate, UploadError> {
    let mime = mime_guess::from_path(path)
        .first_raw()
        .map(str::to_string)
        .unwrap_or_default();

    if !settings.allowed_types.iter().any(|t| t.eq_ignore_ascii_case(&mime)) {
        return Err(UploadError::UnsupportedType(if mime.is_empty() {
            "unknown".to_string()
        } else {
            mime
        }));
    }

    let size = std::fs::metadata(path)?.len();
    let max = settings.max_file_size_mb * 1024 * 1024;
    if size > max {
        return Err(UploadError::TooLarge {
            size,
            max_mb: settings.max_file_size_mb,
        });
    }

    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload")
        .to_string();

    Ok(UploadCandidate {
        path: path.to_path_buf(),
        file_name,
        mime,
        size,
    })
}
