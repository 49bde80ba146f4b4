use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber for a canvas host.
///
/// The baseline level is `info`; passing `debug = true` (the
/// `debug_logging` settings flag) raises it to `debug` and additionally
/// lets `RUST_LOG` override the filter. Without the flag, `RUST_LOG` is
/// ignored so a stray environment variable cannot flood the host with
/// per-sample stroke output.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
