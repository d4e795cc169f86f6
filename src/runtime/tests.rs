use std::io::Cursor;
use std::path::PathBuf;

use super::alerts::ConsoleAlerts;
use super::commands::{Input, parse_command, parse_position};
use super::event_loop;
use super::startup::library_dir;
use super::status_line::{format_mmss, status_line};
use crate::config::{PlaybackSettings, Settings, TimeField, TrackDisplayField, UiSettings};
use crate::player::{
    AlertSink, EngineError, EngineOptions, Handle, MediaEngine, PlaybackState, Player,
    StatusReporter, Track, TrackId,
};

fn t(id: &str, artist: Option<&str>) -> Track {
    Track {
        id: TrackId::from(id),
        uri: format!("/srv/media/{id}.mp3"),
        title: id.to_string(),
        artist: artist.map(str::to_string),
        album: None,
        display: match artist {
            Some(a) => format!("{a} - {id}"),
            None => id.to_string(),
        },
    }
}

#[test]
fn parse_command_accepts_aliases() {
    assert_eq!(parse_command("  "), Ok(Input::Empty));
    assert_eq!(parse_command("n"), Ok(Input::Next));
    assert_eq!(parse_command("NEXT"), Ok(Input::Next));
    assert_eq!(parse_command("b"), Ok(Input::Previous));
    assert_eq!(parse_command("p"), Ok(Input::TogglePause));
    assert_eq!(parse_command("r"), Ok(Input::Repeat));
    assert_eq!(parse_command("s"), Ok(Input::Shuffle));
    assert_eq!(parse_command("close"), Ok(Input::Close));
    assert_eq!(parse_command("play 3"), Ok(Input::Play(3)));
    assert_eq!(parse_command("seek 1:30"), Ok(Input::Seek(90_000)));
    assert_eq!(parse_command("q"), Ok(Input::Quit));
}

#[test]
fn parse_command_rejects_bad_arguments() {
    assert!(parse_command("play").is_err());
    assert!(parse_command("play 0").is_err());
    assert!(parse_command("play x").is_err());
    assert!(parse_command("next 2").is_err());
    assert!(parse_command("seek").is_err());
    assert!(parse_command("seek 1 2").is_err());
    assert!(parse_command("dance").is_err());
}

#[test]
fn parse_position_handles_seconds_and_clock_forms() {
    assert_eq!(parse_position("0"), Some(0));
    assert_eq!(parse_position("90"), Some(90_000));
    assert_eq!(parse_position("2:05"), Some(125_000));
    assert_eq!(parse_position("1:00:00"), Some(3_600_000));
    assert_eq!(parse_position("1:75"), None);
    assert_eq!(parse_position("1:2:3:4"), None);
    assert_eq!(parse_position("-5"), None);
    assert_eq!(parse_position(""), None);
}

#[test]
fn format_mmss_pads_minutes_and_seconds() {
    assert_eq!(format_mmss(std::time::Duration::from_secs(0)), "00:00");
    assert_eq!(format_mmss(std::time::Duration::from_millis(65_900)), "01:05");
    assert_eq!(format_mmss(std::time::Duration::from_secs(3_600)), "60:00");
}

#[test]
fn status_line_for_idle_player() {
    let state = PlaybackState::default();
    assert_eq!(
        status_line(&state, &UiSettings::default()),
        "[stopped] nothing playing"
    );
}

#[test]
fn status_line_shows_track_times_and_flags() {
    let track = t("Psalm 23", Some("Choir"));
    let state = PlaybackState {
        current_track: Some(track.clone()),
        queue: vec![t("Opening", None), track],
        current_index: Some(1),
        is_playing: true,
        position_millis: 62_000,
        duration_millis: 180_000,
        repeat_one: true,
        player_visible: true,
        ..PlaybackState::default()
    };

    assert_eq!(
        status_line(&state, &UiSettings::default()),
        "[playing] 2/2 Choir - Psalm 23 01:02 / 03:00 (repeat-one)"
    );

    let ui = UiSettings {
        now_playing_track_fields: vec![TrackDisplayField::Title, TrackDisplayField::Filename],
        now_playing_track_separator: " | ".into(),
        now_playing_time_fields: vec![TimeField::Remaining],
        now_playing_time_separator: " / ".into(),
    };
    assert_eq!(
        status_line(&state, &ui),
        "[playing] 2/2 Psalm 23 | Psalm 23 -01:58 (repeat-one)"
    );
}

#[test]
fn status_line_can_show_progress() {
    let state = PlaybackState {
        current_track: Some(t("Sermon", None)),
        queue: vec![t("Sermon", None)],
        current_index: Some(0),
        position_millis: 450_000,
        duration_millis: 1_800_000,
        player_visible: true,
        ..PlaybackState::default()
    };
    let ui = UiSettings {
        now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Progress],
        ..UiSettings::default()
    };
    assert_eq!(status_line(&state, &ui), "[paused] 1/1 Sermon 07:30 / 25%");
}

#[test]
fn status_line_hides_unknown_duration() {
    let state = PlaybackState {
        current_track: Some(t("Live", None)),
        queue: vec![t("Live", None)],
        current_index: Some(0),
        is_buffering: true,
        position_millis: 5_000,
        player_visible: true,
        shuffle: true,
        ..PlaybackState::default()
    };
    assert_eq!(
        status_line(&state, &UiSettings::default()),
        "[buffering] 1/1 Live 00:05 (shuffle)"
    );
}

#[test]
fn console_alerts_write_title_and_message() {
    let mut alerts = ConsoleAlerts::new(Vec::new());
    alerts.notify("Playback failed", "Could not play \"X\"");
    let text = String::from_utf8(alerts.into_inner()).unwrap();
    assert!(text.contains("!! Playback failed"));
    assert!(text.contains("!! Could not play \"X\""));
}

#[test]
fn library_dir_prefers_argument() {
    assert_eq!(
        library_dir(Some(PathBuf::from("/srv/sermons"))),
        PathBuf::from("/srv/sermons")
    );
}

/// Accepts everything and never reports.
struct SilentEngine;

impl MediaEngine for SilentEngine {
    fn configure(&mut self, _options: &EngineOptions) -> Result<(), EngineError> {
        Ok(())
    }

    fn load(
        &mut self,
        _handle: Handle,
        _uri: &str,
        _autoplay: bool,
        _reporter: StatusReporter,
    ) -> Result<(), EngineError> {
        Ok(())
    }

    fn play(&mut self, _handle: Handle) -> Result<(), EngineError> {
        Ok(())
    }

    fn pause(&mut self, _handle: Handle) -> Result<(), EngineError> {
        Ok(())
    }

    fn seek(&mut self, _handle: Handle, _position_millis: u64) -> Result<(), EngineError> {
        Ok(())
    }

    fn replay_from_start(&mut self, _handle: Handle) -> Result<(), EngineError> {
        Ok(())
    }

    fn unload(&mut self, _handle: Handle) -> Result<(), EngineError> {
        Ok(())
    }
}

#[test]
fn event_loop_drives_player_until_quit() {
    let tracks = vec![t("A", None), t("B", None), t("C", None)];
    let player = Player::spawn(
        || Ok(SilentEngine),
        ConsoleAlerts::new(Vec::new()),
        PlaybackSettings::default(),
        EngineOptions::default(),
    )
    .unwrap();

    let input = Cursor::new("list\nplay 2\nn\nplay 9\nbogus\nquit\nn\n");
    let mut out: Vec<u8> = Vec::new();
    event_loop::run(input, &mut out, &Settings::default(), &tracks, &player).unwrap();
    player.quit();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("   1. A"));
    assert!(text.contains("   3. C"));
    assert!(text.contains("no track 9 (library has 3)"));
    assert!(text.contains("unknown command 'bogus'"));

    // `n` after quit was never read.
    let s = player.snapshot();
    assert_eq!(s.queue.len(), 3);
    assert_eq!(s.current_index, Some(2));
}
