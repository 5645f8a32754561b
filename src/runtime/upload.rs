use std::io::{self, Write};
use std::path::Path;

use crate::config;
use crate::upload::{self, UploadError};

/// Validate and upload `file`, printing progress to stdout.
pub fn run(file: &Path, settings: &config::Settings) -> Result<(), UploadError> {
    let candidate = upload::validate(file, &settings.upload)?;
    println!(
        "Uploading {} ({}, {} bytes)",
        candidate.file_name, candidate.mime, candidate.size
    );

    let url = upload::upload(&candidate, &settings.upload, |pct| {
        print!("\r{pct:>3}%");
        let _ = io::stdout().flush();
    })?;

    println!("\nUploaded: {url}");
    Ok(())
}
