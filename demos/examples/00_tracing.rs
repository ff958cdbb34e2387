use chrono::{Duration, Utc};
use tsgate::StreamKind;
use tsgate_demos::common::get_gateway;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,tsgate=trace,tsgate_http=debug,tsgate_store=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    // Mock providers when TSGATE_DEMOS_USE_MOCK is set, HTTP otherwise
    let gateway = get_gateway().await?;

    for stream in StreamKind::ALL {
        let p = gateway.provider(stream);
        tracing::info!(%stream, provider = %p.key(), vendor = p.vendor(), "provider registered");
    }

    let end = Utc::now();
    let start = end - Duration::minutes(15);

    // First call fetches and stores, second is served from the store
    for _ in 0..2 {
        let report = gateway.series("ActivePower", start, end).await?;
        tracing::info!(points = report.points.len(), message = %report.message, "reconciled");
    }

    Ok(())
}
