//! Player-related small types and handles.
//!
//! This module defines the track/queue model, the controller state shared
//! with readers, the command set and the status reports engines emit.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Identifier of a track, unique within a queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(pub String);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A playable media item. The controller only looks at `id` and `uri`.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub uri: String,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub display: String,
}

/// Engine resource id. Every load gets a fresh generation so reports from a
/// superseded resource can be told apart from the live one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Controller-owned playback state. Readers get published clones.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    pub queue: Vec<Track>,
    /// `None` when nothing has been loaded yet.
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub is_buffering: bool,
    pub position_millis: u64,
    /// Never 0.
    pub duration_millis: u64,
    pub repeat_one: bool,
    pub shuffle: bool,
    /// Whether a "now playing" surface should be shown.
    pub player_visible: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track: None,
            queue: Vec::new(),
            current_index: None,
            is_playing: false,
            is_buffering: false,
            position_millis: 0,
            duration_millis: 1,
            repeat_one: false,
            shuffle: false,
            player_visible: false,
        }
    }
}

impl PlaybackState {
    /// Playback progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let ratio = self.position_millis as f64 / self.duration_millis.max(1) as f64;
        ratio.clamp(0.0, 1.0)
    }
}

pub type StateHandle = Arc<Mutex<PlaybackState>>;

#[derive(Debug)]
pub enum PlayerCmd {
    /// Play `track` now, optionally adopting `queue` as the new queue.
    LoadAndPlay {
        track: Track,
        queue: Option<Vec<Track>>,
    },
    /// Toggle pause/resume.
    TogglePlayPause,
    /// Skip to the next track (wraps).
    Next,
    /// Restart the current track or go to the previous one (wraps).
    Previous,
    /// Seek to an absolute position in milliseconds.
    Seek(u64),
    /// Flip repeat-one.
    ToggleRepeatOne,
    /// Flip shuffle.
    ToggleShuffle,
    /// Release the engine resource and hide the player.
    Close,
    /// Close and stop the controller thread.
    Quit,
}

/// Engine-side view of a resource, as carried by a status report.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineStatus {
    Loaded {
        position_millis: u64,
        /// `None` until the engine knows the duration.
        duration_millis: Option<u64>,
        is_playing: bool,
        is_buffering: bool,
        /// The engine loops the resource natively.
        is_looping: bool,
        did_just_finish: bool,
    },
    Unloaded {
        error: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub handle: Handle,
    pub status: EngineStatus,
}
