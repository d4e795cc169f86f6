use std::time::Duration;

use crate::config::{TimeField, UiSettings};
use crate::library::TrackText;
use crate::player::PlaybackState;

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Elapsed/total/remaining/progress per `UiSettings`. A duration of 1ms means unknown.
fn time_text(state: &PlaybackState, ui: &UiSettings) -> Option<String> {
    let elapsed = Duration::from_millis(state.position_millis);
    let total = (state.duration_millis > 1).then(|| Duration::from_millis(state.duration_millis));

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    parts.push(format!("-{}", format_mmss(t.saturating_sub(elapsed))));
                }
            }
            TimeField::Progress => {
                if total.is_some() {
                    parts.push(format!("{:.0}%", state.progress() * 100.0));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

/// One-line summary of the player, e.g. `[playing] 2/5 Psalm 23 01:02 / 03:00 (repeat-one)`.
pub fn status_line(state: &PlaybackState, ui: &UiSettings) -> String {
    let Some(track) = state.current_track.as_ref().filter(|_| state.player_visible) else {
        return "[stopped] nothing playing".to_string();
    };

    let label = if state.is_buffering {
        "buffering"
    } else if state.is_playing {
        "playing"
    } else {
        "paused"
    };

    let mut line = format!("[{label}]");
    if let Some(i) = state.current_index {
        line.push_str(&format!(" {}/{}", i + 1, state.queue.len()));
    }
    line.push(' ');
    line.push_str(
        &TrackText::of(track).compose(&ui.now_playing_track_fields, &ui.now_playing_track_separator),
    );
    if let Some(t) = time_text(state, ui) {
        line.push(' ');
        line.push_str(&t);
    }

    let flags: Vec<&str> = [
        state.repeat_one.then_some("repeat-one"),
        state.shuffle.then_some("shuffle"),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !flags.is_empty() {
        line.push_str(&format!(" ({})", flags.join(", ")));
    }

    line
}
