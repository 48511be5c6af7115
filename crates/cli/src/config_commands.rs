use std::path::{Path, PathBuf};

use {anyhow::Result, clap::Subcommand};

use notifman_config::validate::{self, Severity};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors/warnings.
    Check {
        /// File to check instead of the discovered one.
        path: Option<PathBuf>,
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Print the effective configuration (file, env overrides, defaults) as TOML.
    Show,
}

pub fn handle_config(action: ConfigAction, config_dir: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Check { path, verbose } => check(path.as_deref(), config_dir, verbose),
        ConfigAction::Show => {
            let config = notifman_config::discover_and_load(config_dir);
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        },
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(path: Option<&Path>, config_dir: Option<&Path>, verbose: bool) -> Result<()> {
    let result = validate::validate(path, config_dir);

    match result.config_path {
        Some(ref p) => eprintln!("Checking {}\n", p.display()),
        None => eprintln!("No config file found; checking defaults.\n"),
    }

    let shown: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| verbose || d.severity != Severity::Info)
        .collect();

    for d in &shown {
        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
            Severity::Info => CYAN,
        };
        if d.path.is_empty() {
            eprintln!("  {BOLD}{color}{}{RESET} {}", d.severity, d.message);
        } else {
            eprintln!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message);
        }
    }
    if !shown.is_empty() {
        eprintln!();
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        anyhow::bail!("config has {errors} error(s)");
    }
    Ok(())
}
