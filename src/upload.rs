//! Uploading new tracks straight to the media host.
//!
//! Files are checked against the configured MIME allow-list and size ceiling
//! before any bytes leave the machine.

mod client;
mod validate;

use thiserror::Error;

pub use client::upload;
pub use validate::{UploadCandidate, validate};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file type {0} is not supported; upload MP3, WAV or OGG")]
    UnsupportedType(String),

    #[error("file is {size} bytes; the limit is {max_mb} MB")]
    TooLarge { size: u64, max_mb: u64 },

    #[error("upload.cloud_name is not configured")]
    NotConfigured,

    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("host rejected the upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected upload response: {0}")]
    BadResponse(String),
}

#[cfg(test)]
mod tests;
