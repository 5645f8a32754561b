//! Direct-to-host upload with progress reporting.

use std::fs::File;
use std::io::{self, Read};
use std::time::Duration;

use log::{info, warn};
use reqwest::blocking::{Client, multipart};
use serde::Deserialize;

use crate::config::UploadSettings;

use super::UploadError;
use super::validate::UploadCandidate;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Upload endpoint for a media host account. Audio is stored as the "video" resource type.
pub fn upload_endpoint(cloud_name: &str) -> String {
    format!("https://api.cloudinary.com/v1_1/{cloud_name}/video/upload")
}

/// Rounded percentage of `sent` over `total`; an empty body counts as done.
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent as f64 / total as f64) * 100.0).round().min(100.0) as u8
}

/// Wraps a reader and reports each change in the percentage read.
pub struct ProgressReader<R, P> {
    inner: R,
    sent: u64,
    total: u64,
    last: Option<u8>,
    on_progress: P,
}

impl<R, P: FnMut(u8)> ProgressReader<R, P> {
    pub fn new(inner: R, total: u64, on_progress: P) -> Self {
        Self {
            inner,
            sent: 0,
            total,
            last: None,
            on_progress,
        }
    }
}

impl<R: Read, P: FnMut(u8)> Read for ProgressReader<R, P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.sent += n as u64;
        let pct = percent(self.sent, self.total);
        if self.last != Some(pct) {
            self.last = Some(pct);
            (self.on_progress)(pct);
        }
        Ok(n)
    }
}

/// Upload `candidate` and return the durable URL the host assigned to it.
pub fn upload<P>(
    candidate: &UploadCandidate,
    settings: &UploadSettings,
    on_progress: P,
) -> Result<String, UploadError>
where
    P: FnMut(u8) + Send + 'static,
{
    if settings.cloud_name.trim().is_empty() {
        return Err(UploadError::NotConfigured);
    }

    let file = File::open(&candidate.path)?;
    let reader = ProgressReader::new(file, candidate.size, on_progress);
    let part = multipart::Part::reader_with_length(reader, candidate.size)
        .file_name(candidate.file_name.clone())
        .mime_str(&candidate.mime)?;
    let form = multipart::Form::new()
        .text("upload_preset", settings.upload_preset.clone())
        .part("file", part);

    let client = Client::builder().timeout(Duration::from_secs(300)).build()?;
    let endpoint = upload_endpoint(settings.cloud_name.trim());
    info!("uploading {} ({} bytes) to {endpoint}", candidate.file_name, candidate.size);

    let response = client.post(&endpoint).multipart(form).send()?;
    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        warn!("upload rejected with {status}: {message}");
        return Err(UploadError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    parse_secure_url(&body)
}

pub fn parse_secure_url(body: &str) -> Result<String, UploadError> {
    serde_json::from_str::<UploadResponse>(body)
        .map(|r| r.secure_url)
        .map_err(|e| UploadError::BadResponse(e.to_string()))
}
