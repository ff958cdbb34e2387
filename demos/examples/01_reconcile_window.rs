use chrono::{Duration, Utc};
use tsgate_demos::common::get_gateway;

fn fmt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let gateway = get_gateway().await?;

    let sensor = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "furnace_temperature".to_string());
    let end = Utc::now();
    let start = end - Duration::minutes(30);

    let report = gateway.series(&sensor, start, end).await?;

    println!("{sensor}: {}", report.message);
    println!("{:<22} {:>10} {:>10}", "timestamp", "real", "predicted");
    for p in &report.points {
        println!(
            "{:<22} {:>10} {:>10}",
            p.timestamp.format("%Y-%m-%d %H:%M"),
            fmt(p.real_value),
            fmt(p.predicted_value)
        );
    }
    Ok(())
}
