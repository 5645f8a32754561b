use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_explicit_env_var() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SOUNDSHELF_CONFIG_PATH", "/tmp/soundshelf-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/soundshelf-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("soundshelf")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("soundshelf")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_falls_back_to_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state")
            .join("soundshelf")
            .join("soundshelf.log")
    );
}

#[test]
fn defaults_match_the_hosted_library_setup() {
    let s = Settings::default();
    assert_eq!(s.catalog.endpoint, "http://localhost:3000/api/audios");
    assert_eq!(s.catalog.max_results, 50);
    assert_eq!(s.controls.skip_seconds, 10);
    assert_eq!(s.playback.progress_interval_ms, 1000);
    assert_eq!(s.upload.max_file_size_mb, 20);
    assert!(s.upload.allowed_types.iter().any(|t| t == "audio/mpeg"));
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
endpoint = "https://music.example/api/audios"
max_results = 30
timeout_secs = 3

[playback]
initial_volume = 0.4
progress_interval_ms = 250

[controls]
skip_seconds = 15
volume_step = 0.05

[cache]
max_bytes = 1048576

[upload]
cloud_name = "demo"
upload_preset = "tracks"
max_file_size_mb = 10
allowed_types = ["audio/ogg"]

[logging]
level = "debug"
file = "/tmp/soundshelf.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::remove("SOUNDSHELF__CATALOG__MAX_RESULTS");

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.catalog.endpoint, "https://music.example/api/audios");
    assert_eq!(s.catalog.max_results, 30);
    assert_eq!(s.catalog.timeout_secs, 3);
    assert!((s.playback.initial_volume - 0.4).abs() < f32::EPSILON);
    assert_eq!(s.playback.progress_interval_ms, 250);
    assert_eq!(s.controls.skip_seconds, 15);
    assert_eq!(s.cache.max_bytes, 1_048_576);
    assert_eq!(s.upload.cloud_name, "demo");
    assert_eq!(s.upload.upload_preset, "tracks");
    assert_eq!(s.upload.max_file_size_mb, 10);
    assert_eq!(s.upload.allowed_types, vec!["audio/ogg".to_string()]);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/soundshelf.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
max_results = 30
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SOUNDSHELF__CATALOG__MAX_RESULTS", "5");

    let s = Settings::load_from(Some(&cfg_path)).unwrap();
    assert_eq!(s.catalog.max_results, 5);
}

#[test]
fn validate_rejects_out_of_range_volume() {
    let mut s = Settings::default();
    s.playback.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.progress_interval_ms = 0;
    assert!(s.validate().is_err());
}
