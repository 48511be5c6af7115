//! Shared types and error definitions used across all notifman crates.
//!
//! Everything here mirrors a value the chat client hands to the plugin:
//! connection handles, client ids, message scopes, menu and info-panel kinds.

pub mod error;
pub mod types;

pub use error::{Error, Result};
