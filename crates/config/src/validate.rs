//! Configuration validation.
//!
//! Checks a config file against the known schema, flags unknown or misspelled
//! fields, and reports values the plugin would have to ignore.

use std::{collections::HashMap, fmt, path::Path};

use crate::schema::NotifmanConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "type-error", "value", "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. "menu.poke_icon"
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} [{}] {}", self.severity, self.category, self.message)
        } else {
            write!(
                f,
                "{} [{}] {}: {}",
                self.severity, self.category, self.path, self.message
            )
        }
    }
}

/// Result of validating a configuration file.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<std::path::PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Levels `tracing` understands on their own.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

// ── Schema tree for unknown-field detection ─────────────────────────────────

enum KnownKeys {
    Struct(HashMap<&'static str, KnownKeys>),
    Leaf,
}

fn build_schema_map() -> KnownKeys {
    use KnownKeys::{Leaf, Struct};

    Struct(HashMap::from([
        (
            "logging",
            Struct(HashMap::from([("level", Leaf), ("json", Leaf)])),
        ),
        (
            "menu",
            Struct(HashMap::from([
                ("plugin_icon", Leaf),
                ("private_chat_icon", Leaf),
                ("channel_chat_icon", Leaf),
                ("server_chat_icon", Leaf),
                ("poke_icon", Leaf),
            ])),
        ),
    ]))
}

// ── Levenshtein distance ────────────────────────────────────────────────────

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut curr = Vec::with_capacity(prev.len());
        curr.push(i + 1);
        for (j, cb) in b_chars.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr.push(substitution.min(prev[j + 1] + 1).min(curr[j] + 1));
        }
        prev = curr;
    }
    prev[b_chars.len()]
}

/// Closest candidate within `max_distance` edits, if any.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, levenshtein(needle, c)))
        .filter(|(_, d)| *d > 0 && *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

// ── Core validation ─────────────────────────────────────────────────────────

/// Validate a config file at the given path, or the discovered one if `path`
/// is `None`.
#[must_use]
pub fn validate(path: Option<&Path>, client_config_dir: Option<&Path>) -> ValidationResult {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => crate::loader::find_config_file(client_config_dir),
    };

    let Some(ref actual_path) = config_path else {
        return ValidationResult {
            diagnostics: vec![Diagnostic {
                severity: Severity::Info,
                category: "file-ref",
                path: String::new(),
                message: "no config file found; using defaults".into(),
            }],
            config_path: None,
        };
    };

    let is_toml = actual_path
        .extension()
        .and_then(|e| e.to_str())
        .is_none_or(|ext| ext == "toml");

    let mut result = if is_toml {
        match std::fs::read_to_string(actual_path) {
            Ok(content) => validate_toml_str(&crate::env_subst::substitute_env(&content)),
            Err(e) => single(Severity::Error, "syntax", format!("failed to read config file: {e}")),
        }
    } else {
        // Only TOML gets field-level checks; other formats must simply load.
        match crate::loader::load_config(actual_path) {
            Ok(config) => {
                let mut diagnostics = Vec::new();
                check_values(&config, &mut diagnostics);
                ValidationResult {
                    diagnostics,
                    config_path: None,
                }
            },
            Err(e) => single(Severity::Error, "type-error", e.to_string()),
        }
    };
    result.config_path = config_path;
    result
}

fn single(severity: Severity, category: &'static str, message: String) -> ValidationResult {
    ValidationResult {
        diagnostics: vec![Diagnostic {
            severity,
            category,
            path: String::new(),
            message,
        }],
        config_path: None,
    }
}

/// Validate a TOML string without touching the file system.
#[must_use]
pub fn validate_toml_str(toml_str: &str) -> ValidationResult {
    let toml_value: toml::Value = match toml::from_str(toml_str) {
        Ok(v) => v,
        Err(e) => return single(Severity::Error, "syntax", format!("TOML syntax error: {e}")),
    };

    let mut diagnostics = Vec::new();
    check_unknown_fields(&toml_value, &build_schema_map(), "", &mut diagnostics);

    match toml::from_str::<NotifmanConfig>(toml_str) {
        Ok(config) => check_values(&config, &mut diagnostics),
        Err(e) => diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "type-error",
            path: String::new(),
            message: format!("type error: {e}"),
        }),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn check_unknown_fields(
    value: &toml::Value,
    schema: &KnownKeys,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (toml::Value::Table(table), KnownKeys::Struct(fields)) = (value, schema) else {
        return;
    };
    let known_keys: Vec<&str> = fields.keys().copied().collect();
    for (key, child_value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        if let Some(child_schema) = fields.get(key.as_str()) {
            check_unknown_fields(child_value, child_schema, &path, diagnostics);
            continue;
        }
        let message = match suggest(key, &known_keys, 3) {
            Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
            None => "unknown field".to_string(),
        };
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "unknown-field",
            path,
            message,
        });
    }
}

fn check_values(config: &NotifmanConfig, diagnostics: &mut Vec<Diagnostic>) {
    let level = config.logging.level.trim();
    if level.is_empty() {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            category: "value",
            path: "logging.level".into(),
            message: "empty log level; \"info\" will be used".into(),
        });
    } else if !level.contains('=') && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        let message = match suggest(&level.to_ascii_lowercase(), LOG_LEVELS, 2) {
            Some(s) => format!("unknown log level \"{level}\" (did you mean \"{s}\"?)"),
            None => format!("unknown log level \"{level}\""),
        };
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "value",
            path: "logging.level".into(),
            message,
        });
    }

    let icons = [
        ("menu.plugin_icon", &config.menu.plugin_icon),
        ("menu.private_chat_icon", &config.menu.private_chat_icon),
        ("menu.channel_chat_icon", &config.menu.channel_chat_icon),
        ("menu.server_chat_icon", &config.menu.server_chat_icon),
        ("menu.poke_icon", &config.menu.poke_icon),
    ];
    for (path, icon) in icons {
        if icon.trim().is_empty() {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                category: "value",
                path: path.into(),
                message: "empty icon name; the menu item will have no icon".into(),
            });
        }
    }
}
