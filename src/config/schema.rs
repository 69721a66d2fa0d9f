use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/allegro/config.toml` or `~/.config/allegro/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ALLEGRO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub player: PlayerSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Absolute path of the music library. Written once at first start.
    pub root: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            extensions: ["mp3", "flac", "m4a", "ogg", "wav", "wma"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Player executable, resolved on `PATH`.
    pub binary: String,
    /// IPC endpoint handed to `--input-ipc-server`.
    pub ipc_endpoint: String,
    /// How long to wait for the IPC endpoint to accept a connection.
    pub connect_timeout_ms: u64,
    /// Volume change applied by one volume key press.
    pub volume_step: i32,
    /// Extra arguments appended after the fixed player flags.
    pub extra_args: Vec<String>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            binary: "mpv".to_string(),
            ipc_endpoint: default_ipc_endpoint(),
            connect_timeout_ms: 5_000,
            volume_step: 5,
            extra_args: Vec::new(),
        }
    }
}

#[cfg(windows)]
fn default_ipc_endpoint() -> String {
    r"\\.\pipe\allegro-mpv".to_string()
}

#[cfg(not(windows))]
fn default_ipc_endpoint() -> String {
    std::env::temp_dir()
        .join("allegro-mpv.sock")
        .display()
        .to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Maximum number of list rows shown at once.
    pub window_rows: usize,
    /// How many rows above the selection stay visible once the list scrolls.
    pub window_lead: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: "allegro folder browser".to_string(),
            window_rows: 15,
            window_lead: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log file. Defaults to the XDG state directory.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
