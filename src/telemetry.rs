use crate::config::ObservabilityConfig;
use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so `--json`
/// output on stdout stays machine readable.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()?;

    tracing::debug!("team-pulse telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one team aggregation pass
pub fn create_aggregation_span(
    operation: &str,
    member_count: usize,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "team_aggregation",
        operation = operation,
        team.members = member_count,
        correlation.id = correlation_id,
    )
}
