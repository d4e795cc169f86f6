use std::path::PathBuf;

use tracing::{info, warn};

use crate::config;

/// Load settings, falling back to defaults when the config is unusable.
pub fn load_settings(config_path: Option<PathBuf>) -> config::Settings {
    let loaded = match config_path {
        Some(path) => {
            info!(path = %path.display(), "using config file from command line");
            config::Settings::load_from(Some(path))
        }
        None => config::Settings::load(),
    };

    match loaded {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            warn!(error = %e, "failed to load config, using defaults");
            config::Settings::default()
        }
    }
}
