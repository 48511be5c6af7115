//! Configuration loading, validation, and env substitution.
//!
//! Config files: `notifman.toml`, `notifman.yaml`, `notifman.yml`, or
//! `notifman.json`. Searched in the chat client's config directory, then `./`,
//! then the user config dir (`~/.config/notifman/`).
//!
//! Supports `${ENV_VAR}` substitution in all string values. Toggle states are
//! not part of the config: they always start enabled.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, discover_and_load, find_config_file, load_config},
    schema::{LoggingConfig, MenuConfig, NotifmanConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
