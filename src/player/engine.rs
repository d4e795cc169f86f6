//! Capability traits the controller talks to.
//!
//! A `MediaEngine` owns the actual decoding/output; an `AlertSink` is the
//! user-visible failure surface. Both are plugged into the controller so it
//! can be driven by fakes in tests.

use std::fmt;
use std::sync::Arc;

use super::error::EngineError;
use super::types::{Handle, StatusReport};

/// Options applied once when the controller starts.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Keep producing audio while the host app is in the background.
    pub background_playback: bool,
    /// Output volume, `0.0..=1.0`.
    pub volume: f32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            background_playback: true,
            volume: 1.0,
        }
    }
}

/// Callback engines use to push status reports back to the controller.
#[derive(Clone)]
pub struct StatusReporter(Arc<dyn Fn(StatusReport) + Send + Sync>);

impl StatusReporter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(StatusReport) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn report(&self, report: StatusReport) {
        (self.0)(report)
    }
}

impl fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatusReporter")
    }
}

/// A media playback engine holding at most a few live resources.
///
/// Every method addresses a resource by the `Handle` the controller chose at
/// load time. Status reports must carry that same handle.
pub trait MediaEngine {
    fn configure(&mut self, options: &EngineOptions) -> Result<(), EngineError>;

    fn load(
        &mut self,
        handle: Handle,
        uri: &str,
        autoplay: bool,
        reporter: StatusReporter,
    ) -> Result<(), EngineError>;

    fn play(&mut self, handle: Handle) -> Result<(), EngineError>;

    fn pause(&mut self, handle: Handle) -> Result<(), EngineError>;

    /// Move to `position_millis`. Range checking is up to the engine.
    fn seek(&mut self, handle: Handle, position_millis: u64) -> Result<(), EngineError>;

    fn replay_from_start(&mut self, handle: Handle) -> Result<(), EngineError>;

    /// Release the resource. Unloading an unknown handle is not an error.
    fn unload(&mut self, handle: Handle) -> Result<(), EngineError>;
}

/// User-visible notification surface.
pub trait AlertSink {
    fn notify(&mut self, title: &str, message: &str);
}
