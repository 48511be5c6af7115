use anyhow::Result;

use {
    notifman_common::types::{ClientId, ConnectionId, InfoCategory},
    notifman_config::NotifmanConfig,
    notifman_plugin::{HostFunctions, NotificationManager, manifest},
};

/// Host that answers nothing; enough to render menus and info frames.
struct OfflineHost;

impl HostFunctions for OfflineHost {
    fn client_id(
        &self,
        _connection: ConnectionId,
    ) -> notifman_plugin::Result<ClientId> {
        Err(notifman_plugin::Error::message("not connected"))
    }

    fn request_send_private_text(
        &self,
        _connection: ConnectionId,
        _body: &str,
        _target: ClientId,
        _return_code: Option<&str>,
    ) -> notifman_plugin::Result<()> {
        Err(notifman_plugin::Error::message("not connected"))
    }

    fn print_message_to_current_tab(&self, text: &str) {
        println!("{text}");
    }
}

const CATEGORIES: &[InfoCategory] = &[
    InfoCategory::Server,
    InfoCategory::Channel,
    InfoCategory::Client,
];

pub fn handle_info(json: bool) -> Result<()> {
    let plugin = NotificationManager::with_config(OfflineHost, NotifmanConfig::default());
    let meta = manifest::manifest();

    if json {
        let frames: Vec<serde_json::Value> = CATEGORIES
            .iter()
            .map(|c| serde_json::json!({ "category": c, "text": plugin.info_for(*c) }))
            .collect();
        let out = serde_json::json!({
            "manifest": meta,
            "menu_icon": plugin.menu_icon(),
            "menu": plugin.menu_items(),
            "info_frames": frames,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} {} by {}", meta.name, meta.version, meta.author);
    println!("plugin API {}", meta.api_version);
    for line in meta.description.lines() {
        println!("  {line}");
    }

    println!("\nMenu ({}):", plugin.menu_icon());
    for item in plugin.menu_items() {
        println!("  [{}] {} ({})", item.id, item.text, item.icon);
    }

    println!("\n{}:", plugin.info_title());
    for category in CATEGORIES {
        println!("  {category:?}:{}", plugin.info_for(*category).replace('\n', "\n    "));
    }
    Ok(())
}
