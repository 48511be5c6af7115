use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The chat client rejected a request; `code` is the client's error code.
    #[error("{call} failed with client error {code:#06x}")]
    HostCall { call: &'static str, code: u32 },

    /// A raw client value (menu type, menu item id) the plugin does not know.
    #[error(transparent)]
    Common(#[from] notifman_common::Error),

    /// Auto-replies kept bouncing between peers of a loopback network.
    #[error("auto-replies still bouncing after {hops} deliveries")]
    ReplyStorm { hops: usize },

    #[error("unknown peer: {name}")]
    UnknownPeer { name: String },

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn host_call(call: &'static str, code: u32) -> Self {
        Self::HostCall { call, code }
    }

    #[must_use]
    pub fn unknown_peer(name: impl Into<String>) -> Self {
        Self::UnknownPeer { name: name.into() }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
