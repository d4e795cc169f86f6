use std::path::PathBuf;

use thiserror::Error;

use super::types::Handle;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine setup failed: {0}")]
    Setup(String),
    #[error("no audio output device: {0}")]
    OutputStream(String),
    #[error("unsupported media uri '{0}'")]
    UnsupportedUri(String),
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("resource {0} is not loaded")]
    UnknownHandle(Handle),
    #[error("seek failed: {0}")]
    Seek(String),
}

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("player thread is no longer running")]
    Disconnected,
    #[error(transparent)]
    Engine(#[from] EngineError),
}
