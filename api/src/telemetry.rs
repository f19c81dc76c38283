//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use kt_shared::config::{LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
