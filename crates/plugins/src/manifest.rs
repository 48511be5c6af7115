//! Static plugin metadata the client reads before loading the plugin.

use serde::Serialize;

pub const NAME: &str = notifman_filter::DISPLAY_NAME;
pub const VERSION: &str = "1.0";
/// Plugin API revision the client must speak.
pub const API_VERSION: i32 = 26;
pub const AUTHOR: &str = "EricZones";
pub const DESCRIPTION: &str = concat!(
    "Keep control over incoming text messages and pokes on all servers\n",
    "Toggle server, channel, client messages and pokes on the fly",
);
/// Heading of the plugin's block in the client's info frame.
pub const INFO_TITLE: &str = notifman_filter::DISPLAY_NAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginManifest {
    pub name: &'static str,
    pub version: &'static str,
    pub api_version: i32,
    pub author: &'static str,
    pub description: &'static str,
    pub info_title: &'static str,
}

#[must_use]
pub fn manifest() -> PluginManifest {
    PluginManifest {
        name: NAME,
        version: VERSION,
        api_version: API_VERSION,
        author: AUTHOR,
        description: DESCRIPTION,
        info_title: INFO_TITLE,
    }
}
