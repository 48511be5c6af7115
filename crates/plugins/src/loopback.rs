//! In-process chat network for running several plugin instances against each
//! other.
//!
//! Every peer gets its own [`NotificationManager`] backed by a
//! [`LoopbackHost`]. Messages are delivered the way the real client does it:
//! the recipient sees the message, and the sender receives an echo of its own
//! message with itself as the sender. Auto-replies the plugins request are
//! queued and delivered after the callback that produced them returns, so no
//! plugin is ever re-entered.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet, VecDeque},
    path::PathBuf,
    rc::Rc,
};

use {
    notifman_common::types::{ChatScope, ClientId, ConnectionId},
    notifman_filter::{NotificationKind, ToggleOutcome},
    serde::Serialize,
    tracing::{debug, warn},
};

use crate::{Error, HostFunctions, MenuCommand, NotificationManager, Result};

/// All peers share one server connection.
pub const CONNECTION: ConnectionId = ConnectionId(1);

/// Deliveries allowed per step before the network gives up on a reply storm.
pub const DEFAULT_MAX_HOPS: usize = 32;

#[derive(Debug, Clone)]
struct Outgoing {
    from: ClientId,
    to: ClientId,
    body: String,
}

#[derive(Debug, Default)]
struct Wire {
    outbox: VecDeque<Outgoing>,
    consoles: HashMap<ClientId, Vec<String>>,
    failing: HashSet<ClientId>,
}

/// [`HostFunctions`] for one peer of a [`Loopback`] network.
pub struct LoopbackHost {
    me: ClientId,
    wire: Rc<RefCell<Wire>>,
    config_dir: Option<PathBuf>,
}

impl HostFunctions for LoopbackHost {
    fn client_id(&self, _connection: ConnectionId) -> Result<ClientId> {
        Ok(self.me)
    }

    fn request_send_private_text(
        &self,
        _connection: ConnectionId,
        body: &str,
        target: ClientId,
        _return_code: Option<&str>,
    ) -> Result<()> {
        let mut wire = self.wire.borrow_mut();
        if wire.failing.contains(&self.me) {
            return Err(Error::host_call("requestSendPrivateTextMsg", 0x0200));
        }
        wire.outbox.push_back(Outgoing {
            from: self.me,
            to: target,
            body: body.to_string(),
        });
        Ok(())
    }

    fn print_message_to_current_tab(&self, text: &str) {
        self.wire
            .borrow_mut()
            .consoles
            .entry(self.me)
            .or_default()
            .push(text.to_string());
    }

    fn config_path(&self) -> Option<PathBuf> {
        self.config_dir.clone()
    }
}

/// What reached one peer's plugin, and whether the user got to see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub to: String,
    pub from: String,
    /// `private`, `channel`, `server`, or `poke`.
    pub kind: String,
    pub body: String,
    pub shown: bool,
}

struct Peer {
    name: String,
    plugin: NotificationManager<LoopbackHost>,
}

/// A set of named peers on one simulated server.
pub struct Loopback {
    wire: Rc<RefCell<Wire>>,
    peers: Vec<Peer>,
    max_hops: usize,
    config_dir: Option<PathBuf>,
}

impl Default for Loopback {
    fn default() -> Self {
        Self::new()
    }
}

impl Loopback {
    pub fn new() -> Self {
        Self {
            wire: Rc::new(RefCell::new(Wire::default())),
            peers: Vec::new(),
            max_hops: DEFAULT_MAX_HOPS,
            config_dir: None,
        }
    }

    #[must_use]
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Config directory reported to peers added afterwards.
    #[must_use]
    pub fn with_config_dir(mut self, dir: PathBuf) -> Self {
        self.config_dir = Some(dir);
        self
    }

    /// Add a peer, or return the id of an existing one with the same name.
    pub fn add_peer(&mut self, name: &str) -> ClientId {
        if let Some(id) = self.id_of(name) {
            return id;
        }
        let id = ClientId(u16::try_from(self.peers.len() + 1).unwrap_or(u16::MAX));
        let host = LoopbackHost {
            me: id,
            wire: Rc::clone(&self.wire),
            config_dir: self.config_dir.clone(),
        };
        let mut plugin = NotificationManager::new(host);
        plugin.init();
        plugin.register_plugin_id(&format!("notifman-{name}"));
        debug!(peer = name, client_id = %id, "peer joined");
        self.peers.push(Peer {
            name: name.to_string(),
            plugin,
        });
        id
    }

    #[must_use]
    pub fn peer_names(&self) -> Vec<&str> {
        self.peers.iter().map(|p| p.name.as_str()).collect()
    }

    #[must_use]
    pub fn plugin(&self, name: &str) -> Option<&NotificationManager<LoopbackHost>> {
        self.peers
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.plugin)
    }

    /// Lines printed to this peer's local chat tab so far.
    #[must_use]
    pub fn console(&self, name: &str) -> Vec<String> {
        self.id_of(name)
            .and_then(|id| self.wire.borrow().consoles.get(&id).cloned())
            .unwrap_or_default()
    }

    /// Click the menu entry for `kind` on `peer`'s client.
    pub fn toggle(&mut self, peer: &str, kind: NotificationKind) -> Result<ToggleOutcome> {
        let index = self.index_of(peer)?;
        Ok(self.peers[index]
            .plugin
            .run_command(MenuCommand::for_kind(kind)))
    }

    /// Make `peer`'s client reject outgoing private messages.
    pub fn set_send_failure(&mut self, peer: &str, failing: bool) -> Result<()> {
        let id = self.peers[self.index_of(peer)?].plugin.host().me;
        let mut wire = self.wire.borrow_mut();
        if failing {
            wire.failing.insert(id);
        } else {
            wire.failing.remove(&id);
        }
        Ok(())
    }

    /// Send a text message. Private messages need a recipient; channel and
    /// server messages reach every peer.
    pub fn send_text(
        &mut self,
        from: &str,
        scope: ChatScope,
        to: Option<&str>,
        body: &str,
    ) -> Result<Vec<Delivery>> {
        let sender = self.index_of(from)?;
        let mut deliveries = Vec::new();
        match scope {
            ChatScope::Private => {
                let to = to.ok_or_else(|| Error::message("private message needs a recipient"))?;
                let recipient = self.index_of(to)?;
                self.deliver_private(sender, recipient, body, &mut deliveries);
            },
            _ => {
                for index in 0..self.peers.len() {
                    deliveries.push(self.deliver_text(index, sender, scope, body));
                }
            },
        }
        self.drain(&mut deliveries)?;
        Ok(deliveries)
    }

    /// Poke `to`. Pokes are not echoed to the poker.
    pub fn poke(&mut self, from: &str, to: &str, body: &str) -> Result<Vec<Delivery>> {
        let sender = self.index_of(from)?;
        let recipient = self.index_of(to)?;
        let poker = &self.peers[sender];
        let handled = self.peers[recipient].plugin.on_client_poke_event(
            CONNECTION,
            poker.plugin.host().me,
            &poker.name,
            &unique_id(&poker.name),
            body,
            false,
        );
        let mut deliveries = vec![Delivery {
            to: self.peers[recipient].name.clone(),
            from: self.peers[sender].name.clone(),
            kind: "poke".into(),
            body: body.to_string(),
            shown: !handled,
        }];
        self.drain(&mut deliveries)?;
        Ok(deliveries)
    }

    /// Deliver queued auto-replies until the outbox is empty.
    fn drain(&mut self, deliveries: &mut Vec<Delivery>) -> Result<()> {
        let mut hops = 0;
        loop {
            let next = self.wire.borrow_mut().outbox.pop_front();
            let Some(out) = next else {
                return Ok(());
            };
            hops += 1;
            if hops > self.max_hops {
                warn!(hops, "auto-replies keep bouncing, giving up");
                self.wire.borrow_mut().outbox.clear();
                return Err(Error::ReplyStorm { hops: hops - 1 });
            }
            let (Some(sender), Some(recipient)) =
                (self.index_by_id(out.from), self.index_by_id(out.to))
            else {
                debug!(to = %out.to, "dropping reply to unknown client");
                continue;
            };
            self.deliver_private(sender, recipient, &out.body, deliveries);
        }
    }

    /// Recipient first, then the echo back to the sender.
    fn deliver_private(
        &self,
        sender: usize,
        recipient: usize,
        body: &str,
        deliveries: &mut Vec<Delivery>,
    ) {
        deliveries.push(self.deliver_text(recipient, sender, ChatScope::Private, body));
        if recipient != sender {
            deliveries.push(self.deliver_text(sender, sender, ChatScope::Private, body));
        }
    }

    fn deliver_text(&self, to: usize, from: usize, scope: ChatScope, body: &str) -> Delivery {
        // Through the raw callback, the way the client reports messages.
        let sender = &self.peers[from];
        let handled = self.peers[to].plugin.on_text_message_event(
            CONNECTION,
            scope.target_mode(),
            self.peers[to].plugin.host().me,
            sender.plugin.host().me,
            &sender.name,
            &unique_id(&sender.name),
            body,
            false,
        );
        Delivery {
            to: self.peers[to].name.clone(),
            from: self.peers[from].name.clone(),
            kind: scope.to_string(),
            body: body.to_string(),
            shown: !handled,
        }
    }

    fn id_of(&self, name: &str) -> Option<ClientId> {
        self.peers
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.plugin.host().me)
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.peers
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::unknown_peer(name))
    }

    fn index_by_id(&self, id: ClientId) -> Option<usize> {
        self.peers.iter().position(|p| p.plugin.host().me == id)
    }
}

fn unique_id(name: &str) -> String {
    format!("{name}=")
}
