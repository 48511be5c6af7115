use std::fmt;

use {
    serde::{Deserialize, Serialize},
    tracing::info,
};

#[cfg(feature = "metrics")]
use notifman_metrics::{counter, gauge, labels, toggles as toggle_metrics};

use crate::{DISPLAY_NAME, markup};

/// The four things a user can mute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PrivateChat,
    ChannelChat,
    ServerChat,
    Poke,
}

impl NotificationKind {
    /// All variants, in menu order.
    pub const ALL: &'static [NotificationKind] = &[
        Self::PrivateChat,
        Self::ChannelChat,
        Self::ServerChat,
        Self::Poke,
    ];

    /// Label used in status lines and the info frame.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PrivateChat => "Private Chats",
            Self::ChannelChat => "Channel Chats",
            Self::ServerChat => "Server Chats",
            Self::Poke => "Pokes",
        }
    }

    /// Stable snake_case key, used for metric labels and script input.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::PrivateChat => "private_chat",
            Self::ChannelChat => "channel_chat",
            Self::ServerChat => "server_chat",
            Self::Poke => "poke",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Snapshot of the four switches. `true` means notifications are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleState {
    pub private_chat: bool,
    pub channel_chat: bool,
    pub server_chat: bool,
    pub poke: bool,
}

impl Default for ToggleState {
    fn default() -> Self {
        Self {
            private_chat: true,
            channel_chat: true,
            server_chat: true,
            poke: true,
        }
    }
}

impl ToggleState {
    #[must_use]
    pub fn is_enabled(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::PrivateChat => self.private_chat,
            NotificationKind::ChannelChat => self.channel_chat,
            NotificationKind::ServerChat => self.server_chat,
            NotificationKind::Poke => self.poke,
        }
    }

    fn slot_mut(&mut self, kind: NotificationKind) -> &mut bool {
        match kind {
            NotificationKind::PrivateChat => &mut self.private_chat,
            NotificationKind::ChannelChat => &mut self.channel_chat,
            NotificationKind::ServerChat => &mut self.server_chat,
            NotificationKind::Poke => &mut self.poke,
        }
    }

    /// Number of kinds currently muted.
    #[must_use]
    pub fn muted_count(&self) -> usize {
        NotificationKind::ALL
            .iter()
            .filter(|kind| !self.is_enabled(**kind))
            .count()
    }
}

/// Result of one toggle command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub kind: NotificationKind,
    /// Value of the flag after the flip.
    pub enabled: bool,
    /// Markup line for the user's current chat tab.
    pub status_line: String,
}

/// Owner of the toggle state for the lifetime of the process.
///
/// The client serializes every callback, so the store is a plain owned value
/// mutated through `&mut self`. A host that runs callbacks in parallel must
/// put the owning plugin behind its own lock.
#[derive(Debug, Default, Clone)]
pub struct ToggleStore {
    state: ToggleState,
}

impl ToggleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one flag and describe the new state.
    pub fn toggle(&mut self, kind: NotificationKind) -> ToggleOutcome {
        let slot = self.state.slot_mut(kind);
        *slot = !*slot;
        let enabled = *slot;

        info!(flag = %kind, enabled, "notification toggle flipped");

        #[cfg(feature = "metrics")]
        {
            counter!(
                toggle_metrics::FLIPS_TOTAL,
                labels::FLAG => kind.key(),
                labels::ENABLED => if enabled { "true" } else { "false" }
            )
            .increment(1);
            gauge!(toggle_metrics::MUTED).set(self.state.muted_count() as f64);
        }

        ToggleOutcome {
            kind,
            enabled,
            status_line: status_line(kind, enabled),
        }
    }

    /// Read-only copy of the current flags.
    #[must_use]
    pub fn snapshot(&self) -> ToggleState {
        self.state
    }
}

/// `[color=black]<[b]Notification Manager[/b]> Disabled [color=red]Pokes[/color]`
///
/// The outer black color tag is never closed. The client tolerates it.
#[must_use]
pub fn status_line(kind: NotificationKind, enabled: bool) -> String {
    format!(
        "[color=black]<{}> {} {}",
        markup::bold(DISPLAY_NAME),
        markup::state_word(enabled),
        markup::colored(markup::state_color(enabled), kind.label()),
    )
}
