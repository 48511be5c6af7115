use thiserror::Error;

/// Errors raised while turning raw host values into typed notifman values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A menu item id outside the four toggle commands.
    #[error("unknown menu item id: {0}")]
    UnknownMenuItem(i32),

    /// A menu type the client does not define.
    #[error("unknown menu type: {0}")]
    UnknownMenuType(i32),

    /// An info-panel item type the client does not define.
    #[error("unknown info item type: {0}")]
    UnknownItemType(i32),
}

pub type Result<T> = std::result::Result<T, Error>;
