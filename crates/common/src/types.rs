use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

// ── Identifiers ─────────────────────────────────────────────────────────────

/// Handle of one server connection inside the chat client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-connection client id as assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u16);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Inbound events ──────────────────────────────────────────────────────────

/// Where a text message was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatScope {
    /// One-to-one private chat.
    Private,
    /// Everyone in the sender's channel.
    Channel,
    /// Everyone on the server.
    Server,
    /// A target mode this plugin does not know about. Never filtered.
    Other(u16),
}

impl ChatScope {
    /// Map the client's numeric text-message target mode.
    #[must_use]
    pub fn from_target_mode(mode: u16) -> Self {
        match mode {
            1 => Self::Private,
            2 => Self::Channel,
            3 => Self::Server,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub fn target_mode(self) -> u16 {
        match self {
            Self::Private => 1,
            Self::Channel => 2,
            Self::Server => 3,
            Self::Other(mode) => mode,
        }
    }
}

impl fmt::Display for ChatScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Channel => write!(f, "channel"),
            Self::Server => write!(f, "server"),
            Self::Other(mode) => write!(f, "other({mode})"),
        }
    }
}

/// An inbound text message as reported by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    pub scope: ChatScope,
    pub sender: ClientId,
    pub sender_name: String,
    pub sender_unique_id: String,
    pub body: String,
    /// The client already ignores this sender (e.g. it is on a block list).
    #[serde(default)]
    pub already_filtered: bool,
}

impl TextMessage {
    /// True when the message is the local client's own message echoed back.
    #[must_use]
    pub fn is_from(&self, local: ClientId) -> bool {
        self.sender == local
    }
}

/// An inbound poke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poke {
    pub sender: ClientId,
    pub sender_name: String,
    pub sender_unique_id: String,
    pub body: String,
    #[serde(default)]
    pub already_filtered: bool,
}

/// Either kind of event the filter can judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    TextMessage(TextMessage),
    Poke(Poke),
}

impl InboundEvent {
    #[must_use]
    pub fn sender(&self) -> ClientId {
        match self {
            Self::TextMessage(msg) => msg.sender,
            Self::Poke(poke) => poke.sender,
        }
    }

    /// Short label used in logs and metric labels.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TextMessage(_) => "text_message",
            Self::Poke(_) => "poke",
        }
    }
}

// ── Client UI kinds ─────────────────────────────────────────────────────────

/// Where a plugin menu item lives in the client UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuType {
    Global,
    Channel,
    Client,
}

impl TryFrom<i32> for MenuType {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Global),
            1 => Ok(Self::Channel),
            2 => Ok(Self::Client),
            other => Err(Error::UnknownMenuType(other)),
        }
    }
}

/// Which info frame the client is asking the plugin to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoCategory {
    Server,
    Channel,
    Client,
}

impl TryFrom<i32> for InfoCategory {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Server),
            1 => Ok(Self::Channel),
            2 => Ok(Self::Client),
            other => Err(Error::UnknownItemType(other)),
        }
    }
}
