use dirs::home_dir;
use std::path::PathBuf;

/// Environment variable overriding the appwatch home directory.
pub const HOME_ENV: &str = "APPWATCH_HOME";

/// Returns the primary configuration directory, or None if the user's home cannot be resolved.
pub fn try_appwatch_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(HOME_ENV) {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".appwatch"))
}

/// Default config file: ~/.appwatch/config.toml
pub fn config_path() -> Option<PathBuf> {
    try_appwatch_home().map(|h| h.join("config.toml"))
}

/// Default local version record: ~/.appwatch/versions.json
///
/// Falls back to `versions.json` in the working directory when no home
/// directory can be resolved.
pub fn default_versions_path() -> PathBuf {
    try_appwatch_home().map_or_else(|| PathBuf::from("versions.json"), |h| h.join("versions.json"))
}
