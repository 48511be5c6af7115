//! Notification filtering: the toggle store, the verdict engine, and the
//! markup the client shows for both.
//!
//! Flow: client event → [`evaluate_text_message`] / [`evaluate_poke`] against a
//! [`ToggleState`] snapshot → [`FilterVerdict`] → the caller swallows the
//! event and, for [`FilterVerdict::SuppressAndReply`], sends the sentinel text
//! back to the sender.
//!
//! Evaluation never mutates anything. The only state is the [`ToggleStore`],
//! and it changes only when the user issues a toggle command.

pub mod engine;
pub mod info;
pub mod markup;
pub mod sentinel;
pub mod toggles;

pub use {
    engine::{FilterVerdict, evaluate_poke, evaluate_text_message},
    info::render_info,
    sentinel::Sentinel,
    toggles::{NotificationKind, ToggleOutcome, ToggleState, ToggleStore},
};

/// Name shown in status lines and the client's info frame.
pub const DISPLAY_NAME: &str = "Notification Manager";
