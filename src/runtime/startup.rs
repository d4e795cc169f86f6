use std::path::PathBuf;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::config;
use crate::player::{Player, PlayerError, RodioEngine};

use super::alerts::ConsoleAlerts;

/// Install the global `tracing` subscriber. Logs go to stderr so they do not
/// interleave with command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("psalter=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Library directory from the command line, else the working directory.
pub fn library_dir(arg: Option<PathBuf>) -> PathBuf {
    arg.or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"))
}

/// Start the controller thread on the default audio output.
pub fn start_player(settings: &config::Settings) -> Result<Player, PlayerError> {
    let interval = Duration::from_millis(settings.audio.status_interval_ms.max(1));

    Player::spawn(
        move || RodioEngine::open_default(interval),
        ConsoleAlerts::stdout(),
        settings.playback.clone(),
        settings.audio.engine_options(),
    )
}
