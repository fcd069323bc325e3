use tracing_subscriber::fmt::time::uptime;
use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber. `RUST_LOG` controls verbosity and
/// defaults to `info`.
///
/// ```bash
/// RUST_LOG=debug cargo run
/// RUST_LOG=order_intake::stock=debug,info cargo run
/// ```
pub fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(uptime())
        .compact()
        .init();
}
