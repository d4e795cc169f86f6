//! `MediaEngine` backed by `rodio`.
//!
//! One `Sink` per loaded handle, plus a ticker thread that samples the sink
//! and pushes status reports at a fixed cadence.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, trace};

use super::engine::{EngineOptions, MediaEngine, StatusReporter};
use super::error::EngineError;
use super::types::{EngineStatus, Handle, StatusReport};

pub struct RodioEngine {
    stream: OutputStream,
    options: EngineOptions,
    status_interval: Duration,
    loaded: Option<Loaded>,
}

struct Loaded {
    handle: Handle,
    path: PathBuf,
    sink: Arc<Sink>,
    duration_millis: Option<u64>,
    reporter: StatusReporter,
    ticker: Ticker,
}

impl RodioEngine {
    /// Open the default output device. Must be called on the thread that
    /// will drive the engine.
    pub fn open_default(status_interval: Duration) -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::OutputStream(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped; we already log via tracing.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            options: EngineOptions::default(),
            status_interval,
            loaded: None,
        })
    }

    fn loaded(&self, handle: Handle) -> Result<&Loaded, EngineError> {
        self.loaded
            .as_ref()
            .filter(|l| l.handle == handle)
            .ok_or(EngineError::UnknownHandle(handle))
    }

    fn start(
        &self,
        handle: Handle,
        path: PathBuf,
        autoplay: bool,
        reporter: StatusReporter,
    ) -> Result<Loaded, EngineError> {
        let (sink, duration) = create_sink(&self.stream, &path)?;
        sink.set_volume(self.options.volume);
        if autoplay {
            sink.play();
        }

        let sink = Arc::new(sink);
        let duration_millis = duration.map(|d| d.as_millis() as u64);
        let ticker = Ticker::spawn(
            handle,
            sink.clone(),
            duration_millis,
            reporter.clone(),
            self.status_interval,
        );

        Ok(Loaded {
            handle,
            path,
            sink,
            duration_millis,
            reporter,
            ticker,
        })
    }
}

impl MediaEngine for RodioEngine {
    fn configure(&mut self, options: &EngineOptions) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&options.volume) {
            return Err(EngineError::Setup(format!(
                "volume {} is outside 0.0..=1.0",
                options.volume
            )));
        }
        // Desktop output streams are not suspended with the foreground window,
        // so background playback needs no extra setup here.
        debug!(
            background_playback = options.background_playback,
            volume = options.volume,
            "audio output configured"
        );
        self.options = options.clone();
        Ok(())
    }

    fn load(
        &mut self,
        handle: Handle,
        uri: &str,
        autoplay: bool,
        reporter: StatusReporter,
    ) -> Result<(), EngineError> {
        if let Some(previous) = self.loaded.take() {
            previous.stop();
        }
        let path = resolve_local_path(uri)?;
        self.loaded = Some(self.start(handle, path, autoplay, reporter)?);
        Ok(())
    }

    fn play(&mut self, handle: Handle) -> Result<(), EngineError> {
        self.loaded(handle)?.sink.play();
        Ok(())
    }

    fn pause(&mut self, handle: Handle) -> Result<(), EngineError> {
        self.loaded(handle)?.sink.pause();
        Ok(())
    }

    fn seek(&mut self, handle: Handle, position_millis: u64) -> Result<(), EngineError> {
        self.loaded(handle)?
            .sink
            .try_seek(Duration::from_millis(position_millis))
            .map_err(|e| EngineError::Seek(e.to_string()))
    }

    fn replay_from_start(&mut self, handle: Handle) -> Result<(), EngineError> {
        let current = self.loaded(handle)?;
        let path = current.path.clone();
        let reporter = current.reporter.clone();

        // A drained sink cannot seek back, so rebuild it under the same handle.
        if let Some(previous) = self.loaded.take() {
            previous.stop();
        }
        self.loaded = Some(self.start(handle, path, true, reporter)?);
        Ok(())
    }

    fn unload(&mut self, handle: Handle) -> Result<(), EngineError> {
        if self.loaded.as_ref().is_some_and(|l| l.handle == handle) {
            if let Some(loaded) = self.loaded.take() {
                let reporter = loaded.reporter.clone();
                loaded.stop();
                reporter.report(StatusReport {
                    handle,
                    status: EngineStatus::Unloaded { error: None },
                });
            }
        }
        Ok(())
    }
}

impl Loaded {
    fn stop(self) {
        trace!(handle = %self.handle, duration_millis = ?self.duration_millis, "stopping sink");
        self.sink.stop();
        drop(self.ticker);
    }
}

/// Accept plain paths and `file://` URIs; anything else is remote.
pub(crate) fn resolve_local_path(uri: &str) -> Result<PathBuf, EngineError> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(EngineError::UnsupportedUri(uri.to_string()));
    }
    if let Some(rest) = uri.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    match uri.split_once("://") {
        Some(_) => Err(EngineError::UnsupportedUri(uri.to_string())),
        None => Ok(PathBuf::from(uri)),
    }
}

/// Create a paused `Sink` for `path`, returning it with the decoded duration.
fn create_sink(
    stream: &OutputStream,
    path: &Path,
) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let duration = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.append(source);
    Ok((sink, duration))
}

/// What the ticker reads from the sink each interval.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SinkSample {
    pub empty: bool,
    pub paused: bool,
    pub position: Duration,
}

/// Status for one sample. `did_just_finish` is only set on the edge where the
/// sink runs dry, and the position is held to the known duration.
pub(crate) fn tick(was_empty: bool, sample: SinkSample, duration_millis: Option<u64>) -> EngineStatus {
    let did_just_finish = sample.empty && !was_empty;

    let position_millis = sample.position.as_millis() as u64;
    let position_millis = match duration_millis {
        Some(d) if did_just_finish => d,
        Some(d) => position_millis.min(d),
        None => position_millis,
    };

    EngineStatus::Loaded {
        position_millis,
        duration_millis,
        is_playing: !sample.empty && !sample.paused,
        is_buffering: false,
        is_looping: false,
        did_just_finish,
    }
}

/// Samples a sink on its own thread until dropped.
struct Ticker {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl Ticker {
    fn spawn(
        handle: Handle,
        sink: Arc<Sink>,
        duration_millis: Option<u64>,
        reporter: StatusReporter,
        interval: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = stop.clone();

        let join = thread::spawn(move || {
            let mut was_empty = sink.empty();
            loop {
                thread::sleep(interval);
                if stop_for_thread.load(Ordering::Acquire) {
                    break;
                }

                let sample = SinkSample {
                    empty: sink.empty(),
                    paused: sink.is_paused(),
                    position: sink.get_pos(),
                };
                let status = tick(was_empty, sample, duration_millis);
                was_empty = sample.empty;

                reporter.report(StatusReport { handle, status });
            }
        });

        Self {
            stop,
            join: Some(join),
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}
