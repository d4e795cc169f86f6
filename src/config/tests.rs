use super::load::{default_config_path, resolve_config_path};
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
fn resolve_config_path_prefers_psalter_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("PSALTER_CONFIG_PATH", "/tmp/psalter-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/psalter-test-config.toml")
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
            .join("psalter")
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
            .join("psalter")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.playback.restart_threshold_ms, 3000);
    assert_eq!(s.playback.missing_track, MissingTrackPolicy::Append);
    assert!(!s.playback.repeat_one);
    assert!(s.audio.background_playback);
    assert_eq!(s.audio.status_interval_ms, 250);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat_one = true
restart_threshold_ms = 5000
missing_track = "error"

[audio]
background_playback = false
volume = 0.5
status_interval_ms = 100

[controls]
scrub_seconds = 9

[ui]
now_playing_track_fields = ["artist", "title"]
now_playing_track_separator = " • "
now_playing_time_fields = ["elapsed", "remaining"]
now_playing_time_separator = " | "

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
display_fields = ["filename"]
display_separator = "::"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PSALTER_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("PSALTER__AUDIO__VOLUME");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert!(s.playback.repeat_one);
    assert_eq!(s.playback.restart_threshold_ms, 5000);
    assert_eq!(s.playback.missing_track, MissingTrackPolicy::Reject);
    assert!(!s.audio.background_playback);
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.audio.status_interval_ms, 100);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(
        s.ui.now_playing_track_fields,
        vec![TrackDisplayField::Artist, TrackDisplayField::Title]
    );
    assert_eq!(s.ui.now_playing_track_separator, " • ");
    assert_eq!(
        s.ui.now_playing_time_fields,
        vec![TimeField::Elapsed, TimeField::Remaining]
    );
    assert_eq!(s.ui.now_playing_time_separator, " | ");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.display_separator, "::");
    assert_eq!(s.library.display_fields, vec![TrackDisplayField::Filename]);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
restart_threshold_ms = 3000
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PSALTER_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("PSALTER__PLAYBACK__RESTART_THRESHOLD_MS", "1500");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.restart_threshold_ms, 1500);
}

#[test]
fn missing_config_file_is_not_an_error() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();

    let s = Settings::load_from(Some(dir.path().join("absent.toml"))).unwrap();
    assert_eq!(s.playback.restart_threshold_ms, 3000);
}

#[test]
fn partial_toml_keeps_defaults_for_missing_keys() {
    let s: Settings = toml::from_str(
        r#"
[audio]
volume = 0.25
"#,
    )
    .unwrap();
    assert_eq!(s.audio.volume, 0.25);
    assert_eq!(s.audio.status_interval_ms, 250);
    assert_eq!(s.playback.missing_track, MissingTrackPolicy::Append);
}

#[test]
fn validate_rejects_zero_status_interval_and_bad_volume() {
    let mut s = Settings::default();
    s.audio.status_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.volume = 1.5;
    assert!(s.validate().is_err());
}
