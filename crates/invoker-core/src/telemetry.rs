//! Tracing setup for binaries embedding the recorder.
//!
//! Log lines go to stderr so stdout stays free for the JSON build action.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// Newline-delimited JSON.
    Json,
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber. `RUST_LOG` overrides `level`.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(format: LogFormat, level: Level) -> bool {
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter(level))
            .with(layer.json())
            .try_init()
            .is_ok(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter(level))
            .with(layer)
            .try_init()
            .is_ok(),
    }
}
