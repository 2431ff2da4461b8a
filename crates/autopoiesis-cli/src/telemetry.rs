//! Tracing subscriber setup for the command-line driver.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Logs go to stderr so the grid printed on
/// stdout stays readable.
pub fn init_telemetry(json: bool) -> Result<()> {
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,autopoiesis_world=debug".into()),
        )
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    info!(json, "Telemetry initialized");
    Ok(())
}
