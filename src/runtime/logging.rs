use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{self, LogSettings};

/// Send diagnostics to the log file; the terminal belongs to the UI.
///
/// `RUST_LOG` overrides the configured level. If the file cannot be opened
/// logging stays off and one line goes to stderr.
pub fn init(settings: &LogSettings) {
    let path = settings.file.clone().unwrap_or_else(config::default_log_path);

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("allegro: logging disabled, cannot create {}: {e}", parent.display());
            return;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("allegro: logging disabled, cannot open {}: {e}", path.display());
            return;
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let installed = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter)
        .try_init();
    if let Err(e) = installed {
        eprintln!("allegro: logging disabled: {e}");
    }
}
