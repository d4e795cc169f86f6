use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use crate::library::scan;

mod alerts;
mod commands;
mod event_loop;
mod settings;
mod startup;
mod status_line;

#[cfg(test)]
mod tests;

/// Play sermons and songs from a directory, driven by line commands on stdin.
#[derive(Debug, Parser)]
#[command(name = "psalter", version, about)]
pub struct Cli {
    /// Directory to scan for audio files (defaults to the working directory).
    pub dir: Option<PathBuf>,

    /// Config file to use instead of the XDG location.
    #[arg(long, env = "PSALTER_CONFIG_PATH")]
    pub config: Option<PathBuf>,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    startup::init_tracing();

    let settings = settings::load_settings(cli.config);
    let dir = startup::library_dir(cli.dir);

    let tracks = scan(&dir, &settings.library);
    if tracks.is_empty() {
        warn!(dir = %dir.display(), "no audio files found");
    } else {
        info!(dir = %dir.display(), count = tracks.len(), "library loaded");
    }

    let player = startup::start_player(&settings)?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let result = event_loop::run(stdin.lock(), &mut stdout, &settings, &tracks, &player);

    player.quit();
    result
}
