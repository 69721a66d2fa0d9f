use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{self, LibrarySettings};

const PROMPT: &str = "Please enter the full path to your music library:";
const REPROMPT: &str = "Invalid path. Please enter a valid directory path:";

/// Pick the library root: the first CLI argument, then the configured root,
/// then ask on the terminal and persist the answer.
pub fn resolve_library_root(
    cli_arg: Option<PathBuf>,
    library: &LibrarySettings,
    config_path: Option<&Path>,
) -> io::Result<PathBuf> {
    if let Some(dir) = cli_arg {
        if dir.is_dir() {
            return std::path::absolute(dir);
        }
        eprintln!("allegro: {} is not a directory", dir.display());
    }

    if let Some(dir) = &library.root {
        if dir.is_dir() {
            return std::path::absolute(dir);
        }
        warn!(root = %dir.display(), "configured library root is not a directory");
    }

    let stdin = io::stdin();
    let root = prompt_library_root(stdin.lock(), &mut io::stdout())?;

    match config_path {
        Some(path) => match config::save_library_root(path, &root) {
            Ok(()) => info!(config = %path.display(), "library root saved"),
            Err(e) => {
                warn!(error = %e, "could not save library root");
                eprintln!("allegro: could not save library root: {e}");
            }
        },
        None => warn!("no config location, library root not saved"),
    }
    Ok(root)
}

/// Ask until the answer names an existing directory.
pub fn prompt_library_root<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
) -> io::Result<PathBuf> {
    writeln!(output, "{PROMPT}")?;
    loop {
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no library path given",
            ));
        }
        let candidate = PathBuf::from(line.trim());
        if !candidate.as_os_str().is_empty() && candidate.is_dir() {
            return std::path::absolute(candidate);
        }
        writeln!(output, "{REPROMPT}")?;
    }
}
