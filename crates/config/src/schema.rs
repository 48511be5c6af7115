use serde::{Deserialize, Serialize};

/// Root of `notifman.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifmanConfig {
    pub logging: LoggingConfig,
    pub menu: MenuConfig,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive. `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

/// `[menu]`: icon files the client loads from the plugin's resource folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub plugin_icon: String,
    pub private_chat_icon: String,
    pub channel_chat_icon: String,
    pub server_chat_icon: String,
    pub poke_icon: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            plugin_icon: "plugin.png".into(),
            private_chat_icon: "private.png".into(),
            channel_chat_icon: "channel.png".into(),
            server_chat_icon: "server.png".into(),
            poke_icon: "poke.png".into(),
        }
    }
}
