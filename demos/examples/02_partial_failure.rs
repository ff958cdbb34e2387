use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tsgate::{Gateway, GatewayError, ValuePoint};
use tsgate_mock::{DynamicMockProvider, MockBehavior};
use tsgate_store::MemorySeriesStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Scripted providers: real values arrive, the model is unreachable.
    let (real, real_ctl) = DynamicMockProvider::new_with_controller("digital-twin");
    let (predicted, pred_ctl) = DynamicMockProvider::new_with_controller("prediction-model");

    let end = Utc::now();
    let start = end - chrono::Duration::minutes(5);
    let readings = (0..=5)
        .map(|i| ValuePoint::new(start + chrono::Duration::minutes(i), 20.0 + i as f64))
        .collect();
    real_ctl
        .set_behavior("room_humidity", MockBehavior::Return(readings))
        .await;
    pred_ctl
        .set_behavior(
            "room_humidity",
            MockBehavior::Fail(GatewayError::connection(
                "prediction-model",
                "connection refused",
            )),
        )
        .await;

    let gateway = Gateway::builder()
        .with_store(Arc::new(MemorySeriesStore::new()))
        .real_provider(real)
        .predicted_provider(predicted)
        .request_timeout(Duration::from_secs(30))
        .build()?;

    let report = gateway.series("room_humidity", start, end).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
