use tracing_subscriber::{fmt, EnvFilter};

/// Install a `fmt` subscriber for hosts that don't bring their own.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used (typically
/// [`ActionsConfig::log_filter`](crate::config::ActionsConfig)). Calling this
/// again, or after another subscriber was installed, is a no-op.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = fmt().with_env_filter(filter).with_target(true).try_init();
    if installed.is_ok() {
        tracing::debug!(default_filter, "tracing initialised");
    }
}
