//! Tracing subscriber setup
use super::config::LogConfig;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured filter.
///
/// ```no_run
/// use product_supply::{config::LogConfig, logging};
/// logging::init(&LogConfig::default());
/// ```
pub fn init(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Debug level output captured by the test harness. Safe to call from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
