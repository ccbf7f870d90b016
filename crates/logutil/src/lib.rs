//! Shared logging setup for binaries and tests.

use tracing::Level;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::FmtSubscriber;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    HumanReadable,
    Json,
}

/// Build the env filter, using `default_level` unless overridden by RUST_LOG.
fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

/// Configure the global tracing subscriber.
///
/// Returns `false` if a global subscriber was already set. This happens when
/// multiple tests in the same process each try to configure logging, and is
/// not an error.
pub fn configure_global_logger(default_level: Level, format: LogFormat) -> bool {
    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter(default_level))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::HumanReadable => {
            tracing::subscriber::set_global_default(builder.finish()).is_ok()
        }
        LogFormat::Json => {
            tracing::subscriber::set_global_default(builder.json().finish()).is_ok()
        }
    }
}

/// Configure a subscriber that writes through the test harness so output is
/// captured per test.
pub fn configure_test_logger() -> bool {
    let subscriber = FmtSubscriber::builder()
        .with_test_writer()
        .with_env_filter(env_filter(Level::ERROR))
        .with_file(true)
        .with_line_number(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}
