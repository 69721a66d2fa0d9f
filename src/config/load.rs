use std::path::{Path, PathBuf};
use std::{env, fs, io};

use super::schema::Settings;

/// Errors raised while writing the library root back to the config file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("config file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("existing config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("`library` in the existing config is not a table")]
    NotATable,
}

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `ALLEGRO__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ALLEGRO")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.player.binary.trim().is_empty() {
            return Err("player.binary must not be empty".to_string());
        }
        if self.player.connect_timeout_ms == 0 {
            return Err("player.connect_timeout_ms must be >= 1".to_string());
        }
        if self.player.volume_step == 0 {
            return Err("player.volume_step must not be 0".to_string());
        }
        if self.ui.window_rows == 0 {
            return Err("ui.window_rows must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `ALLEGRO_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ALLEGRO_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/allegro/config.toml`
/// or `~/.config/allegro/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("allegro").join("config.toml"))
}

/// Default log file under `$XDG_STATE_HOME/allegro/` or `~/.local/state/allegro/`,
/// falling back to the temp directory.
pub fn default_log_path() -> PathBuf {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    match state_home {
        Some(d) => d.join("allegro").join("allegro.log"),
        None => env::temp_dir().join("allegro.log"),
    }
}

/// Persist `root` as `library.root` in the config file at `config_path`.
///
/// Any other keys already present in the file are kept.
pub fn save_library_root(config_path: &Path, root: &Path) -> Result<(), PersistError> {
    let io_err = |source: io::Error| PersistError::Io {
        path: config_path.to_path_buf(),
        source,
    };

    let mut doc = match fs::read_to_string(config_path) {
        Ok(text) => toml::from_str::<toml::Table>(&text)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Table::new(),
        Err(e) => return Err(io_err(e)),
    };

    let library = doc
        .entry("library")
        .or_insert(toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(library) = library else {
        return Err(PersistError::NotATable);
    };
    library.insert(
        "root".to_string(),
        toml::Value::String(root.display().to_string()),
    );

    let text = toml::to_string_pretty(&doc)?;
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(config_path, text).map_err(io_err)
}
