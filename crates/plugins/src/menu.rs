use {
    notifman_common::{Error as CommonError, types::MenuType},
    notifman_config::MenuConfig,
    notifman_filter::NotificationKind,
    serde::Serialize,
};

/// The plugin's four global menu entries, one per toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCommand {
    TogglePrivateChats,
    ToggleChannelChats,
    ToggleServerChats,
    TogglePokes,
}

impl MenuCommand {
    pub const ALL: &'static [MenuCommand] = &[
        Self::TogglePrivateChats,
        Self::ToggleChannelChats,
        Self::ToggleServerChats,
        Self::TogglePokes,
    ];

    /// Id the client passes back on click.
    #[must_use]
    pub fn id(self) -> i32 {
        match self {
            Self::TogglePrivateChats => 0,
            Self::ToggleChannelChats => 1,
            Self::ToggleServerChats => 2,
            Self::TogglePokes => 3,
        }
    }

    #[must_use]
    pub fn kind(self) -> NotificationKind {
        match self {
            Self::TogglePrivateChats => NotificationKind::PrivateChat,
            Self::ToggleChannelChats => NotificationKind::ChannelChat,
            Self::ToggleServerChats => NotificationKind::ServerChat,
            Self::TogglePokes => NotificationKind::Poke,
        }
    }

    #[must_use]
    pub fn for_kind(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::PrivateChat => Self::TogglePrivateChats,
            NotificationKind::ChannelChat => Self::ToggleChannelChats,
            NotificationKind::ServerChat => Self::ToggleServerChats,
            NotificationKind::Poke => Self::TogglePokes,
        }
    }

    #[must_use]
    pub fn text(self) -> String {
        format!("Toggle {}", self.kind().label())
    }

    fn icon(self, icons: &MenuConfig) -> &str {
        match self {
            Self::TogglePrivateChats => &icons.private_chat_icon,
            Self::ToggleChannelChats => &icons.channel_chat_icon,
            Self::ToggleServerChats => &icons.server_chat_icon,
            Self::TogglePokes => &icons.poke_icon,
        }
    }
}

impl TryFrom<i32> for MenuCommand {
    type Error = CommonError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.id() == id)
            .ok_or(CommonError::UnknownMenuItem(id))
    }
}

/// One entry the client adds to its plugin menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub menu_type: MenuType,
    pub command: MenuCommand,
    pub id: i32,
    pub text: String,
    pub icon: String,
}

/// Menu entries in display order.
#[must_use]
pub fn menu_items(icons: &MenuConfig) -> Vec<MenuItem> {
    MenuCommand::ALL
        .iter()
        .map(|cmd| MenuItem {
            menu_type: MenuType::Global,
            command: *cmd,
            id: cmd.id(),
            text: cmd.text(),
            icon: cmd.icon(icons).to_string(),
        })
        .collect()
}
