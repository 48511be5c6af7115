//! Metric definitions for the notification manager.
//!
//! Recording goes through the `metrics` crate facade, so every macro call is a
//! no-op until whoever embeds the plugin installs a recorder.
//!
//! ```rust,ignore
//! use notifman_metrics::{counter, filter, labels};
//!
//! counter!(filter::VERDICTS_TOTAL, labels::EVENT_KIND => "poke", labels::VERDICT => "deliver")
//!     .increment(1);
//! ```

mod definitions;

pub use definitions::*;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge};
