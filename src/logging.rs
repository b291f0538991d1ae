use tracing_subscriber::EnvFilter;

/// Logs to stderr. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,menu_lens=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
