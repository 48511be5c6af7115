//! The notification manager as the chat client sees it.
//!
//! [`NotificationManager`] owns the toggle store and answers the client's
//! callbacks (text messages, pokes, menu clicks, info frames). Everything the
//! plugin needs from the client goes through [`HostFunctions`], so the same
//! plugin runs inside the real client binding, the in-process
//! [`loopback::Loopback`] network, and the tests.

pub mod error;
pub mod host;
pub mod loopback;
pub mod manifest;
pub mod menu;
pub mod plugin;
pub mod telemetry;

pub use {
    error::{Error, Result},
    host::HostFunctions,
    menu::{MenuCommand, MenuItem},
    plugin::NotificationManager,
};
