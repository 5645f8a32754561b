use std::io::Read;

use super::UploadError;
use super::client::{ProgressReader, parse_secure_url, percent, upload, upload_endpoint};
use super::validate::validate;
use crate::config::UploadSettings;

fn settings() -> UploadSettings {
    UploadSettings {
        max_file_size_mb: 1,
        ..UploadSettings::default()
    }
}

#[test]
fn validate_accepts_allowed_audio_within_the_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.mp3");
    std::fs::write(&path, vec![0u8; 2048]).unwrap();

    let candidate = validate(&path, &settings()).unwrap();
    assert_eq!(candidate.mime, "audio/mpeg");
    assert_eq!(candidate.size, 2048);
    assert_eq!(candidate.file_name, "demo.mp3");
}

#[test]
fn validate_rejects_unlisted_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"hello").unwrap();

    let err = validate(&path, &settings()).unwrap_err();
    assert!(matches!(err, UploadError::UnsupportedType(ref t) if t == "text/plain"));

    let bare = dir.path().join("noextension");
    std::fs::write(&bare, b"hello").unwrap();
    assert!(matches!(
        validate(&bare, &settings()),
        Err(UploadError::UnsupportedType(ref t)) if t == "unknown"
    ));
}

#[test]
fn validate_rejects_files_over_the_ceiling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.mp3");
    std::fs::write(&path, vec![0u8; 1024 * 1024 + 1]).unwrap();

    assert!(matches!(
        validate(&path, &settings()),
        Err(UploadError::TooLarge { max_mb: 1, .. })
    ));
}

#[test]
fn validate_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        validate(&dir.path().join("gone.mp3"), &settings()),
        Err(UploadError::Io(_))
    ));
}

#[test]
fn percent_rounds_and_caps() {
    assert_eq!(percent(0, 200), 0);
    assert_eq!(percent(1, 200), 1);
    assert_eq!(percent(199, 200), 100);
    assert_eq!(percent(50, 200), 25);
    assert_eq!(percent(300, 200), 100);
    assert_eq!(percent(0, 0), 100);
}

#[test]
fn progress_reader_reports_each_new_percentage_once() {
    let data = vec![7u8; 400];
    let mut seen = Vec::new();
    {
        let mut reader = ProgressReader::new(&data[..], 400, |p| seen.push(p));
        let mut buf = [0u8; 100];
        while reader.read(&mut buf).unwrap() > 0 {}
    }
    assert_eq!(seen, vec![25, 50, 75, 100]);
}

#[test]
fn upload_requires_a_cloud_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.ogg");
    std::fs::write(&path, vec![0u8; 16]).unwrap();
    let candidate = validate(&path, &settings()).unwrap();

    assert!(matches!(
        upload(&candidate, &settings(), |_| {}),
        Err(UploadError::NotConfigured)
    ));
}

#[test]
fn upload_endpoint_targets_the_account() {
    assert_eq!(
        upload_endpoint("demo"),
        "https://api.cloudinary.com/v1_1/demo/video/upload"
    );
}

#[test]
fn parse_secure_url_reads_the_durable_url() {
    let body = r#"{"public_id":"audios/x","secure_url":"https://res.example/x.mp3","bytes":12}"#;
    assert_eq!(parse_secure_url(body).unwrap(), "https://res.example/x.mp3");
    assert!(matches!(parse_secure_url("{}"), Err(UploadError::BadResponse(_))));
}
