use tracing::{debug, error, info, trace, warn};

use crate::config::{MissingTrackPolicy, PlaybackSettings};

use super::engine::{AlertSink, EngineOptions, MediaEngine, StatusReporter};
use super::order::PlayOrder;
use super::types::{EngineStatus, Handle, PlaybackState, PlayerCmd, StatusReport, Track};

/// Owns playback state and the single engine resource, and turns UI commands
/// and engine status reports into state transitions.
pub(crate) struct PlaybackController<E: MediaEngine, A: AlertSink> {
    engine: E,
    alerts: A,
    reporter: StatusReporter,
    state: PlaybackState,
    order: PlayOrder,
    /// The live engine resource, if any.
    handle: Option<Handle>,
    last_generation: u64,
    /// Set once a finished report has been acted on; cleared by the next
    /// report that is not finished.
    finish_latched: bool,
    restart_threshold_ms: u64,
    missing_track: MissingTrackPolicy,
}

impl<E: MediaEngine, A: AlertSink> PlaybackController<E, A> {
    pub fn new(
        mut engine: E,
        alerts: A,
        reporter: StatusReporter,
        playback: &PlaybackSettings,
        options: &EngineOptions,
    ) -> Self {
        // Not fatal: the engine keeps whatever defaults it started with.
        if let Err(e) = engine.configure(options) {
            warn!(error = %e, "engine setup failed, continuing with engine defaults");
        }

        let state = PlaybackState {
            repeat_one: playback.repeat_one,
            shuffle: playback.shuffle,
            ..PlaybackState::default()
        };

        Self {
            engine,
            alerts,
            reporter,
            state,
            order: PlayOrder::default(),
            handle: None,
            last_generation: 0,
            finish_latched: false,
            restart_threshold_ms: playback.restart_threshold_ms,
            missing_track: playback.missing_track,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    /// Dispatch a command. Returns `false` once `Quit` was handled.
    pub fn apply(&mut self, cmd: PlayerCmd) -> bool {
        match cmd {
            PlayerCmd::LoadAndPlay { track, queue } => self.load_and_play(track, queue),
            PlayerCmd::TogglePlayPause => self.toggle_play_pause(),
            PlayerCmd::Next => self.play_next(),
            PlayerCmd::Previous => self.play_previous(),
            PlayerCmd::Seek(ms) => self.seek(ms),
            PlayerCmd::ToggleRepeatOne => self.toggle_repeat_one(),
            PlayerCmd::ToggleShuffle => self.toggle_shuffle(),
            PlayerCmd::Close => self.close(),
            PlayerCmd::Quit => {
                self.close();
                return false;
            }
        }
        true
    }

    pub fn load_and_play(&mut self, track: Track, queue: Option<Vec<Track>>) {
        let index = match queue {
            Some(mut queue) => {
                let index = match queue.iter().position(|t| t.id == track.id) {
                    Some(i) => i,
                    None => match self.missing_track {
                        MissingTrackPolicy::Append => {
                            debug!(track = %track.id, "track not in supplied queue, appending");
                            queue.push(track);
                            queue.len() - 1
                        }
                        MissingTrackPolicy::Reject => {
                            warn!(track = %track.id, "track not in supplied queue, ignoring");
                            self.alerts.notify(
                                "Playback failed",
                                &format!("\"{}\" is not part of the selected list.", track.display),
                            );
                            return;
                        }
                    },
                };
                self.replace_queue(queue, index);
                index
            }
            None => match self.state.queue.iter().position(|t| t.id == track.id) {
                Some(i) => i,
                None => {
                    // Ad-hoc play of a track outside the current queue.
                    self.replace_queue(vec![track], 0);
                    0
                }
            },
        };

        self.load_index(index);
    }

    pub fn toggle_play_pause(&mut self) {
        let Some(handle) = self.handle else {
            return;
        };
        let result = if self.state.is_playing {
            self.engine.pause(handle)
        } else {
            self.engine.play(handle)
        };
        if let Err(e) = result {
            warn!(%handle, error = %e, "play/pause failed");
        }
    }

    pub fn play_next(&mut self) {
        if let Some(next) = self.order.next(self.state.current_index) {
            self.load_index(next);
        }
    }

    pub fn play_previous(&mut self) {
        if self.state.queue.is_empty() {
            return;
        }

        // Restarting needs a live resource; without one fall through to
        // the previous entry.
        if self.state.position_millis > self.restart_threshold_ms {
            if let Some(handle) = self.handle {
                match self.engine.seek(handle, 0) {
                    Ok(()) => self.state.position_millis = 0,
                    Err(e) => {
                        warn!(%handle, error = %e, "restart seek failed, reloading track");
                        if let Some(current) = self.state.current_index {
                            self.load_index(current);
                        }
                    }
                }
                return;
            }
        }

        if let Some(prev) = self.order.previous(self.state.current_index) {
            self.load_index(prev);
        }
    }

    pub fn seek(&mut self, position_millis: u64) {
        let Some(handle) = self.handle else {
            return;
        };
        if let Err(e) = self.engine.seek(handle, position_millis) {
            warn!(%handle, position_millis, error = %e, "seek failed");
        }
    }

    pub fn toggle_repeat_one(&mut self) {
        self.state.repeat_one = !self.state.repeat_one;
        debug!(repeat_one = self.state.repeat_one, "repeat-one toggled");
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
        self.rebuild_order();
        debug!(shuffle = self.state.shuffle, "shuffle toggled");
    }

    /// Release the engine resource and hide the player. Queue and index stay.
    pub fn close(&mut self) {
        self.release();
        self.state.player_visible = false;
        self.state.position_millis = 0;
        self.state.is_playing = false;
        self.state.is_buffering = false;
        self.state.current_track = None;
    }

    pub fn on_status(&mut self, report: StatusReport) {
        if self.handle != Some(report.handle) {
            trace!(handle = %report.handle, "dropping status of superseded resource");
            return;
        }

        match report.status {
            EngineStatus::Unloaded { error } => {
                if let Some(e) = error {
                    warn!(handle = %report.handle, error = %e, "engine reported a playback error");
                }
                self.state.is_buffering = false;
            }
            EngineStatus::Loaded {
                position_millis,
                duration_millis,
                is_playing,
                is_buffering,
                is_looping,
                did_just_finish,
            } => {
                self.state.position_millis = position_millis;
                self.state.duration_millis = duration_millis.filter(|&d| d > 0).unwrap_or(1);
                self.state.is_playing = is_playing;
                self.state.is_buffering = is_buffering;

                if !did_just_finish {
                    self.finish_latched = false;
                } else if !is_looping && !self.finish_latched {
                    self.finish_latched = true;
                    self.on_finished(report.handle);
                }
            }
        }
    }

    fn on_finished(&mut self, handle: Handle) {
        if self.state.repeat_one {
            debug!(%handle, "track finished, replaying");
            if let Err(e) = self.engine.replay_from_start(handle) {
                // The engine dropped the resource while rebuilding it.
                warn!(%handle, error = %e, "replay failed, releasing track");
                self.release();
                self.state.is_playing = false;
                self.state.is_buffering = false;
            }
        } else {
            debug!(%handle, "track finished, advancing");
            self.play_next();
        }
    }

    fn replace_queue(&mut self, queue: Vec<Track>, index: usize) {
        self.state.queue = queue;
        self.state.current_index = Some(index);
        self.rebuild_order();
    }

    fn rebuild_order(&mut self) {
        let len = self.state.queue.len();
        self.order = if self.state.shuffle {
            PlayOrder::shuffled(len, self.state.current_index, &mut rand::rng())
        } else {
            PlayOrder::sequential(len)
        };
    }

    fn load_index(&mut self, index: usize) {
        let Some(track) = self.state.queue.get(index).cloned() else {
            return;
        };

        self.release();

        self.state.current_index = Some(index);
        self.state.player_visible = true;
        self.state.position_millis = 0;
        self.state.duration_millis = 1;
        self.state.is_buffering = false;
        self.finish_latched = false;

        self.last_generation += 1;
        let handle = Handle(self.last_generation);

        match self
            .engine
            .load(handle, &track.uri, true, self.reporter.clone())
        {
            Ok(()) => {
                info!(%handle, track = %track.id, "now playing");
                self.handle = Some(handle);
                self.state.is_playing = true;
            }
            Err(e) => {
                error!(%handle, track = %track.id, error = %e, "failed to load track");
                self.state.is_playing = false;
                self.alerts.notify(
                    "Playback failed",
                    &format!("Could not play \"{}\": {e}", track.display),
                );
            }
        }

        self.state.current_track = Some(track);
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.engine.unload(handle) {
                warn!(%handle, error = %e, "failed to release engine resource");
            }
        }
    }
}

impl<E: MediaEngine, A: AlertSink> Drop for PlaybackController<E, A> {
    fn drop(&mut self) {
        self.release();
    }
}
