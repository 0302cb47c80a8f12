use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `QUITPLAN_LOG` takes precedence over `RUST_LOG`; without either only
/// warnings are shown. Stdout is left to command output.
pub fn init_tracing() {
    let filter = std::env::var("QUITPLAN_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
