//! Playback controller: queue/index/flag state, the engine resource it owns
//! and the thread that serializes commands and engine status reports.

mod controller;
mod engine;
mod error;
mod handle;
mod order;
mod rodio_engine;
mod thread;
mod types;

pub use engine::{AlertSink, EngineOptions, MediaEngine, StatusReporter};
pub use error::{EngineError, PlayerError};
pub use handle::Player;
pub use rodio_engine::RodioEngine;
pub use types::*;
