/// Configure tracing once at startup. `RUST_LOG` controls verbosity, `info` by default.
///
/// ```bash
/// RUST_LOG=debug order_console
/// RUST_LOG=order_console::controllers=debug,info order_console
/// ```
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
