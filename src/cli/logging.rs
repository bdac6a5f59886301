//! Logging initialization

/// Initialize logging based on the debug flag
///
/// Logs go to stderr so composed objects printed on stdout stay pipeable.
/// Without --debug only warnings are shown unless RUST_LOG says otherwise.
pub fn init_logging(debug: bool) {
    let default_filter = if debug { "resbridge=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(debug)
        .init();
}
