use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over the defaults.
pub fn init(debug: bool) {
    let default_filter = if debug {
        "debug,checkin=debug"
    } else {
        "info,checkin=info,wgpu=warn,naga=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (tests, repeated runs) is not an error worth failing on
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
