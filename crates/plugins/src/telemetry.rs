use {
    notifman_config::LoggingConfig,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Returns `false` when a
/// subscriber is already installed in this process (the client may load the
/// plugin more than once, or embed other Rust plugins).
pub fn init(config: &LoggingConfig) -> bool {
    let level = match config.level.trim() {
        "" => "info",
        level => level,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .try_init()
    };
    installed.is_ok()
}
