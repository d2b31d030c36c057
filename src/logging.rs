//! Tracing subscriber setup.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Pick the filter directive: `--verbose` wins over the config file.
///
/// `RUST_LOG`, when set, overrides both in [`filter`].
#[must_use]
pub fn directive(verbose: bool, config: &LoggingConfig) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.level.clone()
    }
}

/// Resolve the active filter, preferring `RUST_LOG`.
#[must_use]
pub fn filter(verbose: bool, config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(verbose, config)))
}

/// Build a subscriber that writes text or JSON lines to `writer`.
#[must_use]
pub fn build<W>(
    filter: EnvFilter,
    config: &LoggingConfig,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    if config.format == "json" {
        Box::new(builder.with_ansi(false).json().finish())
    } else {
        Box::new(builder.finish())
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init(verbose: bool, config: &LoggingConfig) {
    let subscriber = build(filter(verbose, config), config, std::io::stderr);
    if let Err(e) = subscriber.try_init() {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}
