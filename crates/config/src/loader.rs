use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result, env_subst::substitute_env, schema::NotifmanConfig};

/// Standard config file names, checked in order.
pub const CONFIG_FILENAMES: &[&str] = &[
    "notifman.toml",
    "notifman.yaml",
    "notifman.yml",
    "notifman.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<NotifmanConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `<client_config_dir>/notifman.{toml,yaml,yml,json}` (when the chat client reports one)
/// 2. `./notifman.{toml,yaml,yml,json}`
/// 3. `~/.config/notifman/notifman.{toml,yaml,yml,json}`
///
/// Returns `NotifmanConfig::default()` if no config file is found or the
/// file fails to load. Env overrides are applied either way.
pub fn discover_and_load(client_config_dir: Option<&Path>) -> NotifmanConfig {
    let mut config = if let Some(path) = find_config_file(client_config_dir) {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                NotifmanConfig::default()
            },
        }
    } else {
        debug!("no config file found, using defaults");
        NotifmanConfig::default()
    };
    apply_env_overrides(&mut config);
    config
}

/// Find the first config file in standard locations.
pub fn find_config_file(client_config_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Some(dir) = client_config_dir {
        dirs.push(dir.to_path_buf());
    }
    dirs.push(PathBuf::from("."));
    if let Some(dir) = user_config_dir() {
        dirs.push(dir);
    }
    find_in_dirs(&dirs)
}

fn find_in_dirs(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/notifman/`).
pub fn user_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "notifman").map(|d| d.config_dir().to_path_buf())
}

/// Apply `NOTIFMAN_LOG_LEVEL` and `NOTIFMAN_JSON_LOGS` on top of the file.
pub fn apply_env_overrides(config: &mut NotifmanConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(config: &mut NotifmanConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(level) = lookup("NOTIFMAN_LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
        config.logging.level = level.trim().to_string();
    }
    if let Some(json) = lookup("NOTIFMAN_JSON_LOGS") {
        match json.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => config.logging.json = true,
            "0" | "false" | "no" | "off" => config.logging.json = false,
            other => warn!(value = other, "ignoring unrecognized NOTIFMAN_JSON_LOGS"),
        }
    }
}

fn parse_config(raw: &str, path: &Path) -> Result<NotifmanConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}
