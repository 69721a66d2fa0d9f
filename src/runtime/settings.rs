use crate::config::Settings;

/// Load settings, falling back to defaults on any problem.
///
/// Logging is configured from these settings, so a fallback reason is
/// returned for the caller to log once the subscriber is up.
pub fn load_settings() -> (Settings, Option<String>) {
    match Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        Err(e) => (
            Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}
