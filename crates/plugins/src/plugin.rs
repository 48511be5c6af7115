use {
    notifman_common::types::{
        ChatScope, ClientId, ConnectionId, InboundEvent, InfoCategory, MenuType, Poke,
        TextMessage,
    },
    notifman_config::NotifmanConfig,
    notifman_filter::{
        FilterVerdict, ToggleOutcome, ToggleState, ToggleStore, evaluate_poke,
        evaluate_text_message, render_info,
    },
    tracing::{debug, info, trace, warn},
};

#[cfg(feature = "metrics")]
use notifman_metrics::{counter, plugin as plugin_metrics};

use crate::{
    HostFunctions, Result, manifest,
    menu::{self, MenuCommand, MenuItem},
    telemetry,
};

/// One loaded instance of the plugin.
///
/// The client calls into it from a single thread, one callback at a time,
/// so toggles are mutated through `&mut self` without any locking.
pub struct NotificationManager<H> {
    host: H,
    toggles: ToggleStore,
    config: NotifmanConfig,
    plugin_id: Option<String>,
}

impl<H: HostFunctions> NotificationManager<H> {
    /// Plugin with default config. Call [`Self::init`] to pick up the config
    /// file and start logging.
    pub fn new(host: H) -> Self {
        Self::with_config(host, NotifmanConfig::default())
    }

    pub fn with_config(host: H, config: NotifmanConfig) -> Self {
        Self {
            host,
            toggles: ToggleStore::new(),
            config,
            plugin_id: None,
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Load the config (client config dir first) and install logging.
    pub fn init(&mut self) {
        let config_dir = self.host.config_path();
        self.config = notifman_config::discover_and_load(config_dir.as_deref());
        telemetry::init(&self.config.logging);
        info!(
            plugin = manifest::NAME,
            version = manifest::VERSION,
            api_version = manifest::API_VERSION,
            "loading plugin"
        );
    }

    pub fn shutdown(&mut self) {
        info!(plugin = manifest::NAME, "unloading plugin");
        self.plugin_id = None;
    }

    /// Remember the id the client assigned to this plugin instance.
    pub fn register_plugin_id(&mut self, id: &str) {
        debug!(plugin_id = id, "registered plugin id");
        self.plugin_id = Some(id.to_string());
    }

    #[must_use]
    pub fn plugin_id(&self) -> Option<&str> {
        self.plugin_id.as_deref()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn toggles(&self) -> ToggleState {
        self.toggles.snapshot()
    }

    // ── Menus & info frame ──────────────────────────────────────────────────

    #[must_use]
    pub fn menu_items(&self) -> Vec<MenuItem> {
        menu::menu_items(&self.config.menu)
    }

    #[must_use]
    pub fn menu_icon(&self) -> &str {
        &self.config.menu.plugin_icon
    }

    #[must_use]
    pub fn info_title(&self) -> &'static str {
        manifest::INFO_TITLE
    }

    /// Info frame body for a raw client item type, or `None` when the plugin
    /// has nothing to show for it.
    #[must_use]
    pub fn info_data(&self, _connection: ConnectionId, _id: u64, item_type: i32) -> Option<String> {
        let category = InfoCategory::try_from(item_type).ok()?;
        Some(self.info_for(category))
    }

    /// Info frame body for a known category, with the leading newline the
    /// client expects below the title.
    #[must_use]
    pub fn info_for(&self, category: InfoCategory) -> String {
        format!("\n{}", render_info(category, &self.toggles.snapshot()))
    }

    /// Raw menu callback. Only global menu items belong to this plugin;
    /// channel and client menus give `Ok(None)`. Ids the client should never
    /// send (an unknown menu type, or an unknown global item) are errors.
    pub fn on_menu_item_event(
        &mut self,
        connection: ConnectionId,
        menu_type: i32,
        menu_item_id: i32,
        _selected_item_id: u64,
    ) -> Result<Option<ToggleOutcome>> {
        if MenuType::try_from(menu_type)? != MenuType::Global {
            return Ok(None);
        }
        let command = MenuCommand::try_from(menu_item_id)?;
        debug!(connection = %connection, ?command, "menu command");
        Ok(Some(self.run_command(command)))
    }

    /// Flip the command's toggle and print the status line locally.
    pub fn run_command(&mut self, command: MenuCommand) -> ToggleOutcome {
        let outcome = self.toggles.toggle(command.kind());
        self.host.print_message_to_current_tab(&outcome.status_line);
        outcome
    }

    // ── Event callbacks ─────────────────────────────────────────────────────

    /// Raw text message callback. Returns `true` when the client must not
    /// display the message.
    #[allow(clippy::too_many_arguments)]
    pub fn on_text_message_event(
        &self,
        connection: ConnectionId,
        target_mode: u16,
        _to: ClientId,
        from: ClientId,
        from_name: &str,
        from_unique_id: &str,
        body: &str,
        ff_ignored: bool,
    ) -> bool {
        let msg = TextMessage {
            scope: ChatScope::from_target_mode(target_mode),
            sender: from,
            sender_name: from_name.to_string(),
            sender_unique_id: from_unique_id.to_string(),
            body: body.to_string(),
            already_filtered: ff_ignored,
        };
        self.handle_event(connection, &InboundEvent::TextMessage(msg))
    }

    /// Judge one inbound event and send the auto-reply it calls for.
    /// Returns `true` when the client must not display the event.
    pub fn handle_event(&self, connection: ConnectionId, event: &InboundEvent) -> bool {
        trace!(
            connection = %connection,
            event_kind = event.kind(),
            sender = %event.sender(),
            "inbound event"
        );
        match event {
            InboundEvent::TextMessage(msg) => self.handle_text_message(connection, msg),
            InboundEvent::Poke(poke) => self.handle_poke(connection, poke),
        }
    }

    pub fn handle_text_message(&self, connection: ConnectionId, msg: &TextMessage) -> bool {
        if msg.already_filtered {
            return false;
        }
        let local = match self.host.client_id(connection) {
            Ok(id) => id,
            Err(e) => {
                // Without knowing who "self" is the loop guard cannot work.
                warn!(
                    connection = %connection,
                    error = %e,
                    "could not resolve own client id, delivering message"
                );
                return false;
            },
        };
        let verdict = evaluate_text_message(msg, &self.toggles.snapshot(), local);
        self.apply(connection, verdict)
    }

    /// Raw poke callback. Returns `true` when the client must not display
    /// the poke.
    pub fn on_client_poke_event(
        &self,
        connection: ConnectionId,
        from: ClientId,
        poker_name: &str,
        poker_unique_id: &str,
        body: &str,
        ff_ignored: bool,
    ) -> bool {
        let poke = Poke {
            sender: from,
            sender_name: poker_name.to_string(),
            sender_unique_id: poker_unique_id.to_string(),
            body: body.to_string(),
            already_filtered: ff_ignored,
        };
        self.handle_event(connection, &InboundEvent::Poke(poke))
    }

    pub fn handle_poke(&self, connection: ConnectionId, poke: &Poke) -> bool {
        let verdict = evaluate_poke(poke, &self.toggles.snapshot());
        self.apply(connection, verdict)
    }

    /// Send the auto-reply a verdict asks for. A failed send does not change
    /// the verdict: the event stays suppressed.
    fn apply(&self, connection: ConnectionId, verdict: FilterVerdict) -> bool {
        if let FilterVerdict::SuppressAndReply { target, sentinel } = verdict
            && let Err(e) =
                self.host
                    .request_send_private_text(connection, sentinel.text(), target, None)
        {
            warn!(connection = %connection, target = %target, error = %e, "auto-reply not sent");
            #[cfg(feature = "metrics")]
            counter!(plugin_metrics::REPLY_FAILURES_TOTAL).increment(1);
        }
        verdict.is_handled()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::Error,
        notifman_common::Error as CommonError,
        notifman_filter::sentinel,
        std::{cell::RefCell, path::PathBuf},
    };

    const CONN: ConnectionId = ConnectionId(1);
    const ME: ClientId = ClientId(1);
    const PEER: ClientId = ClientId(5);

    #[derive(Default)]
    struct RecordingHost {
        identity: Option<ClientId>,
        fail_sends: bool,
        config_dir: Option<PathBuf>,
        sent: RefCell<Vec<(ClientId, String)>>,
        printed: RefCell<Vec<String>>,
    }

    impl RecordingHost {
        fn new() -> Self {
            Self {
                identity: Some(ME),
                ..Self::default()
            }
        }
    }

    impl HostFunctions for RecordingHost {
        fn client_id(&self, _connection: ConnectionId) -> Result<ClientId> {
            self.identity
                .ok_or_else(|| Error::host_call("getClientID", 0x0200))
        }

        fn request_send_private_text(
            &self,
            _connection: ConnectionId,
            body: &str,
            target: ClientId,
            _return_code: Option<&str>,
        ) -> Result<()> {
            if self.fail_sends {
                return Err(Error::host_call("requestSendPrivateTextMsg", 0x0301));
            }
            self.sent.borrow_mut().push((target, body.to_string()));
            Ok(())
        }

        fn print_message_to_current_tab(&self, text: &str) {
            self.printed.borrow_mut().push(text.to_string());
        }

        fn config_path(&self) -> Option<PathBuf> {
            self.config_dir.clone()
        }
    }

    fn private_from(
        plugin: &NotificationManager<&RecordingHost>,
        from: ClientId,
        body: &str,
    ) -> bool {
        plugin.on_text_message_event(CONN, 1, ME, from, "peer", "uid-peer", body, false)
    }

    #[test]
    fn menu_click_toggles_and_prints_locally() {
        let host = RecordingHost::new();
        let mut plugin = NotificationManager::new(&host);

        let outcome = plugin.on_menu_item_event(CONN, 0, 3, 0).unwrap().unwrap();
        assert!(!outcome.enabled);
        assert!(!plugin.toggles().poke);
        assert_eq!(
            host.printed.borrow().as_slice(),
            ["[color=black]<[b]Notification Manager[/b]> Disabled [color=red]Pokes[/color]"]
        );
        assert!(host.sent.borrow().is_empty());
    }

    #[test]
    fn channel_and_client_menus_are_ignored() {
        let host = RecordingHost::new();
        let mut plugin = NotificationManager::new(&host);

        assert!(plugin.on_menu_item_event(CONN, 1, 0, 0).unwrap().is_none());
        assert!(plugin.on_menu_item_event(CONN, 2, 3, 0).unwrap().is_none());
        assert_eq!(plugin.toggles(), ToggleState::default());
        assert!(host.printed.borrow().is_empty());
    }

    #[test]
    fn unknown_menu_ids_are_errors() {
        let host = RecordingHost::new();
        let mut plugin = NotificationManager::new(&host);

        assert!(matches!(
            plugin.on_menu_item_event(CONN, 0, 9, 0),
            Err(Error::Common(CommonError::UnknownMenuItem(9)))
        ));
        assert!(matches!(
            plugin.on_menu_item_event(CONN, 42, 0, 0),
            Err(Error::Common(CommonError::UnknownMenuType(42)))
        ));
        assert_eq!(plugin.toggles(), ToggleState::default());
        assert!(host.printed.borrow().is_empty());
    }

    #[test]
    fn muted_private_chat_sends_one_sentinel_to_sender() {
        let host = RecordingHost::new();
        let mut plugin = NotificationManager::new(&host);
        plugin.run_command(MenuCommand::TogglePrivateChats);

        assert!(private_from(&plugin, PEER, "hello?"));
        assert_eq!(
            host.sent.borrow().as_slice(),
            [(PEER, sentinel::PRIVATE_CHATS_DISABLED.to_string())]
        );

        // The client echoes our reply back to us: swallowed, not answered.
        assert!(private_from(&plugin, ME, sentinel::PRIVATE_CHATS_DISABLED));
        assert_eq!(host.sent.borrow().len(), 1);
    }

    #[test]
    fn muted_pokes_reply_with_poke_sentinel() {
        let host = RecordingHost::new();
        let mut plugin = NotificationManager::new(&host);
        plugin.run_command(MenuCommand::TogglePokes);

        assert!(plugin.on_client_poke_event(CONN, PEER, "peer", "uid-peer", "hey", false));
        assert_eq!(
            host.sent.borrow().as_slice(),
            [(PEER, sentinel::POKES_DISABLED.to_string())]
        );

        // Ignored pokers are left to the client.
        assert!(!plugin.on_client_poke_event(CONN, PEER, "peer", "uid-peer", "hey", true));
        assert_eq!(host.sent.borrow().len(), 1);
    }

    #[test]
    fn typed_events_match_raw_callbacks() {
        let host = RecordingHost::new();
        let mut plugin = NotificationManager::new(&host);
        plugin.run_command(MenuCommand::TogglePokes);

        let poke = InboundEvent::Poke(Poke {
            sender: PEER,
            sender_name: "peer".into(),
            sender_unique_id: "uid-peer".into(),
            body: "hey".into(),
            already_filtered: false,
        });
        assert!(plugin.handle_event(CONN, &poke));

        let text = InboundEvent::TextMessage(TextMessage {
            scope: ChatScope::from_target_mode(1),
            sender: PEER,
            sender_name: "peer".into(),
            sender_unique_id: "uid-peer".into(),
            body: "hi".into(),
            already_filtered: false,
        });
        assert!(!plugin.handle_event(CONN, &text));
        assert_eq!(
            host.sent.borrow().as_slice(),
            [(PEER, sentinel::POKES_DISABLED.to_string())]
        );
    }

    #[test]
    fn failed_reply_keeps_event_suppressed() {
        let host = RecordingHost {
            fail_sends: true,
            ..RecordingHost::new()
        };
        let mut plugin = NotificationManager::new(&host);
        plugin.run_command(MenuCommand::TogglePokes);
        plugin.run_command(MenuCommand::TogglePrivateChats);

        assert!(plugin.on_client_poke_event(CONN, PEER, "peer", "uid-peer", "hey", false));
        assert!(private_from(&plugin, PEER, "hi"));
        assert!(host.sent.borrow().is_empty());
    }

    #[test]
    fn unknown_identity_delivers() {
        let host = RecordingHost {
            identity: None,
            ..RecordingHost::new()
        };
        let mut plugin = NotificationManager::new(&host);
        plugin.run_command(MenuCommand::TogglePrivateChats);

        assert!(!private_from(&plugin, PEER, "hi"));
        assert!(host.sent.borrow().is_empty());
    }

    #[test]
    fn group_chats_are_muted_without_reply() {
        let host = RecordingHost::new();
        let mut plugin = NotificationManager::new(&host);
        plugin.run_command(MenuCommand::ToggleChannelChats);

        assert!(plugin.on_text_message_event(CONN, 2, ME, PEER, "peer", "u", "hi", false));
        assert!(!plugin.on_text_message_event(CONN, 3, ME, PEER, "peer", "u", "hi", false));
        assert!(!plugin.on_text_message_event(CONN, 2, ME, ME, "me", "u", "hi", false));
        assert!(host.sent.borrow().is_empty());
    }

    #[test]
    fn info_frames_follow_toggles() {
        let host = RecordingHost::new();
        let mut plugin = NotificationManager::new(&host);
        plugin.run_command(MenuCommand::ToggleServerChats);

        assert_eq!(
            plugin.info_data(CONN, 0, 0).unwrap(),
            "\n[b]Server Chats:[/b] [color=red]Disabled[/color]"
        );
        let client = plugin.info_data(CONN, 5, 2).unwrap();
        assert!(client.contains("[b]Private Chats:[/b] [color=green]Enabled[/color]\n\n"));
        assert!(client.ends_with("[b]Pokes:[/b] [color=green]Enabled[/color]"));
        assert_eq!(plugin.info_data(CONN, 0, 7), None);
    }

    #[test]
    fn init_reads_config_from_client_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("notifman.toml"),
            "[menu]\nplugin_icon = \"bell.png\"\n",
        )
        .unwrap();
        let host = RecordingHost {
            config_dir: Some(dir.path().to_path_buf()),
            ..RecordingHost::new()
        };
        let mut plugin = NotificationManager::new(&host);
        plugin.init();
        plugin.register_plugin_id("notifman-test");

        assert_eq!(plugin.menu_icon(), "bell.png");
        assert_eq!(plugin.plugin_id(), Some("notifman-test"));
        assert_eq!(plugin.toggles(), ToggleState::default());

        plugin.shutdown();
        assert_eq!(plugin.plugin_id(), None);
    }
}
