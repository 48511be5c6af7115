use std::path::PathBuf;

use notifman_common::types::{ClientId, ConnectionId};

use crate::Result;

/// Capabilities the chat client lends to the plugin.
///
/// Every method is called synchronously from inside a client callback. None
/// of them may call back into the plugin.
pub trait HostFunctions {
    /// Id of the local user on `connection`.
    fn client_id(&self, connection: ConnectionId) -> Result<ClientId>;

    /// Queue a private text message. Returning `Ok` only means the client
    /// accepted the request, not that the message arrived.
    fn request_send_private_text(
        &self,
        connection: ConnectionId,
        body: &str,
        target: ClientId,
        return_code: Option<&str>,
    ) -> Result<()>;

    /// Show a line in the chat tab the user is currently looking at. Never
    /// sent to anyone else.
    fn print_message_to_current_tab(&self, text: &str);

    /// Directory the client keeps plugin configuration in, if it has one.
    fn config_path(&self) -> Option<PathBuf> {
        None
    }
}

impl<H: HostFunctions + ?Sized> HostFunctions for &H {
    fn client_id(&self, connection: ConnectionId) -> Result<ClientId> {
        (**self).client_id(connection)
    }

    fn request_send_private_text(
        &self,
        connection: ConnectionId,
        body: &str,
        target: ClientId,
        return_code: Option<&str>,
    ) -> Result<()> {
        (**self).request_send_private_text(connection, body, target, return_code)
    }

    fn print_message_to_current_tab(&self, text: &str) {
        (**self).print_message_to_current_tab(text);
    }

    fn config_path(&self) -> Option<PathBuf> {
        (**self).config_path()
    }
}
