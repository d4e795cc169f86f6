use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use crate::config::PlaybackSettings;

use super::controller::PlaybackController;
use super::engine::{AlertSink, EngineOptions, MediaEngine, StatusReporter};
use super::error::EngineError;
use super::types::{PlayerCmd, StateHandle, StatusReport};

/// Everything the controller thread reacts to, in arrival order.
#[derive(Debug)]
pub(super) enum PlayerMsg {
    Command(PlayerCmd),
    Status(StatusReport),
}

/// Start the controller thread.
///
/// The engine is built on the new thread by `make_engine`; if that fails the
/// error is sent back on `ready` and the thread exits.
pub(super) fn spawn_controller_thread<E, F, A>(
    make_engine: F,
    alerts: A,
    tx: Sender<PlayerMsg>,
    rx: Receiver<PlayerMsg>,
    state: StateHandle,
    playback: PlaybackSettings,
    options: EngineOptions,
    ready: mpsc::SyncSender<Result<(), EngineError>>,
) -> JoinHandle<()>
where
    E: MediaEngine,
    F: FnOnce() -> Result<E, EngineError> + Send + 'static,
    A: AlertSink + Send + 'static,
{
    thread::spawn(move || {
        let engine = match make_engine() {
            Ok(engine) => engine,
            Err(e) => {
                error!(error = %e, "media engine unavailable");
                let _ = ready.send(Err(e));
                return;
            }
        };

        let reporter = StatusReporter::new(move |report| {
            // The receiver only goes away when the thread is exiting.
            let _ = tx.send(PlayerMsg::Status(report));
        });

        let mut controller = PlaybackController::new(engine, alerts, reporter, &playback, &options);
        publish(&controller, &state);
        let _ = ready.send(Ok(()));

        while let Ok(msg) = rx.recv() {
            let keep_running = match msg {
                PlayerMsg::Command(cmd) => {
                    debug!(?cmd, "command");
                    controller.apply(cmd)
                }
                PlayerMsg::Status(report) => {
                    controller.on_status(report);
                    true
                }
            };

            publish(&controller, &state);
            if !keep_running {
                break;
            }
        }

        debug!(handle = ?controller.handle(), "controller thread exiting");
    })
}

fn publish<E: MediaEngine, A: AlertSink>(controller: &PlaybackController<E, A>, state: &StateHandle) {
    if let Ok(mut s) = state.lock() {
        s.clone_from(controller.state());
    }
}
