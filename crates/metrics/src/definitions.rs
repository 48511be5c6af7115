//! Metric name and label definitions.
//!
//! Centralizing the names keeps the filter engine and the plugin façade in
//! agreement about what gets recorded.

/// Filter engine metrics
pub mod filter {
    /// Total number of verdicts returned, labelled by event kind and verdict
    pub const VERDICTS_TOTAL: &str = "notifman_filter_verdicts_total";
    /// Total number of sentinel echoes swallowed by the loop guard
    pub const LOOP_GUARD_HITS_TOTAL: &str = "notifman_filter_loop_guard_hits_total";
}

/// Toggle store metrics
pub mod toggles {
    /// Total number of toggle commands, labelled by flag and resulting state
    pub const FLIPS_TOTAL: &str = "notifman_toggle_flips_total";
    /// Number of notification kinds currently muted
    pub const MUTED: &str = "notifman_toggles_muted";
}

/// Plugin façade metrics
pub mod plugin {
    /// Total number of auto-replies that the client refused to send
    pub const REPLY_FAILURES_TOTAL: &str = "notifman_plugin_reply_failures_total";
}

/// Common label keys
pub mod labels {
    pub const EVENT_KIND: &str = "event_kind";
    pub const VERDICT: &str = "verdict";
    pub const FLAG: &str = "flag";
    pub const ENABLED: &str = "enabled";
    pub const SCOPE: &str = "scope";
}
