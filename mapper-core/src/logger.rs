use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global JSON subscriber on stderr, leaving stdout to command output.
/// `RUST_LOG` wins over `default_directive`.
pub fn init_logging(default_directive: &str) {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json();

    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
