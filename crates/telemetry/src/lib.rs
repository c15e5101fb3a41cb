//! Tracing bootstrap for the books API.

use tracing_subscriber::EnvFilter;

use books_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the tracing/logging pipeline.
///
/// The filter honours `RUST_LOG` and falls back to `info`. Output format
/// follows the configured `log_format`.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match settings.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    result.map_err(|err| anyhow::anyhow!("failed to initialize tracing subscriber: {err}"))
}
