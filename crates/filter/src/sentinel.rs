//! Auto-reply bodies that double as loop-breaking tokens.
//!
//! Two plugin instances talk to each other through these exact strings: a
//! peer that muted pokes answers every poke with [`POKES_DISABLED`], a peer
//! that muted private chats answers every private message with
//! [`PRIVATE_CHATS_DISABLED`]. The client echoes the reply back to the peer
//! that sent it, and that echo must be swallowed instead of answered. Matching
//! is exact, byte for byte; changing either string breaks interop with
//! already-deployed instances.

use serde::{Deserialize, Serialize};

use crate::NotificationKind;

pub const POKES_DISABLED: &str = "This user [color=red]disabled[/color] pokes";
pub const PRIVATE_CHATS_DISABLED: &str = "This user [color=red]disabled[/color] private chats";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentinel {
    PokesDisabled,
    PrivateChatsDisabled,
}

impl Sentinel {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::PokesDisabled => POKES_DISABLED,
            Self::PrivateChatsDisabled => PRIVATE_CHATS_DISABLED,
        }
    }

    /// The toggle whose "off" state makes this sentinel a live token.
    #[must_use]
    pub fn guarded_kind(self) -> NotificationKind {
        match self {
            Self::PokesDisabled => NotificationKind::Poke,
            Self::PrivateChatsDisabled => NotificationKind::PrivateChat,
        }
    }

    /// Exact-match lookup of a message body.
    #[must_use]
    pub fn recognize(body: &str) -> Option<Self> {
        match body {
            POKES_DISABLED => Some(Self::PokesDisabled),
            PRIVATE_CHATS_DISABLED => Some(Self::PrivateChatsDisabled),
            _ => None,
        }
    }
}
