mod config_commands;
mod info_commands;
mod simulate_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    notifman_config::LoggingConfig,
    tracing::debug,
};

#[derive(Parser)]
#[command(
    name = "notifman",
    about = "Notification Manager: mute chats and pokes with polite auto-replies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Directory searched for notifman.toml before ./ and ~/.config/notifman/.
    #[arg(long, global = true, env = "NOTIFMAN_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show plugin metadata, menu entries, and the default info frames.
    Info {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Replay a JSON-lines script of toggles, messages, and pokes between
    /// simulated peers.
    Simulate {
        /// Script file, one step per line. `-` reads stdin.
        script: PathBuf,
        /// Output each step as a JSON line.
        #[arg(long)]
        json: bool,
        /// Deliveries allowed per step before reporting a reply storm.
        #[arg(long, default_value_t = notifman_plugin::loopback::DEFAULT_MAX_HOPS)]
        max_hops: usize,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    notifman_plugin::telemetry::init(&LoggingConfig {
        level: cli.log_level.clone(),
        json: cli.json_logs,
    });

    debug!(version = env!("CARGO_PKG_VERSION"), "notifman starting");

    match cli.command {
        Commands::Info { json } => info_commands::handle_info(json),
        Commands::Simulate {
            script,
            json,
            max_hops,
        } => simulate_commands::handle_simulate(&script, json, max_hops, cli.config_dir),
        Commands::Config { action } => {
            config_commands::handle_config(action, cli.config_dir.as_deref())
        },
    }
}
