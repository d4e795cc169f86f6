use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::PlaybackSettings;

use super::engine::{AlertSink, EngineOptions, MediaEngine};
use super::error::{EngineError, PlayerError};
use super::thread::{PlayerMsg, spawn_controller_thread};
use super::types::{PlaybackState, PlayerCmd, StateHandle, Track};

/// Front door to the controller thread. Cheap to share by reference; every
/// method just posts a message.
pub struct Player {
    tx: Sender<PlayerMsg>,
    state: StateHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    pub fn spawn<E, F, A>(
        make_engine: F,
        alerts: A,
        playback: PlaybackSettings,
        options: EngineOptions,
    ) -> Result<Self, PlayerError>
    where
        E: MediaEngine,
        F: FnOnce() -> Result<E, EngineError> + Send + 'static,
        A: AlertSink + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<PlayerMsg>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let state: StateHandle = Arc::new(Mutex::new(PlaybackState::default()));

        let join = spawn_controller_thread(
            make_engine,
            alerts,
            tx.clone(),
            rx,
            state.clone(),
            playback,
            options,
            ready_tx,
        );

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                state,
                join: Mutex::new(Some(join)),
            }),
            Ok(Err(e)) => {
                let _ = join.join();
                Err(e.into())
            }
            Err(_) => {
                let _ = join.join();
                Err(PlayerError::Disconnected)
            }
        }
    }

    /// Copy of the last published state.
    pub fn snapshot(&self) -> PlaybackState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), PlayerError> {
        self.tx
            .send(PlayerMsg::Command(cmd))
            .map_err(|_| PlayerError::Disconnected)
    }

    pub fn load_and_play(&self, track: Track, queue: Option<Vec<Track>>) -> Result<(), PlayerError> {
        self.send(PlayerCmd::LoadAndPlay { track, queue })
    }

    pub fn toggle_play_pause(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::TogglePlayPause)
    }

    pub fn play_next(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Next)
    }

    pub fn play_previous(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Previous)
    }

    pub fn seek(&self, position_millis: u64) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Seek(position_millis))
    }

    pub fn toggle_repeat_one(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::ToggleRepeatOne)
    }

    pub fn toggle_shuffle(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::ToggleShuffle)
    }

    pub fn close(&self) -> Result<(), PlayerError> {
        self.send(PlayerCmd::Close)
    }

    /// Stop the controller thread and wait for it. Safe to call twice.
    pub fn quit(&self) {
        let _ = self.send(PlayerCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.quit();
    }
}
