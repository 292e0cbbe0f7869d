use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. `RUST_LOG` overrides `filter`, e.g.
/// `RUST_LOG=superbridge=debug` to see run phases and built transactions.
///
/// Logs go to stderr so they do not interleave with menu output on stdout.
pub fn log_init(filter: String) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
