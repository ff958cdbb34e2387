use std::sync::Arc;

use tsgate::{Gateway, GatewayError, SeriesStore, ValueProvider};
use tsgate_http::{HttpProviderConfig, HttpValueProvider};
use tsgate_mock::{GeneratorRegistry, RegistryProvider};
use tsgate_store::{MemorySeriesStore, PgSeriesStore};

/// Real-value and predicted-value providers for demos.
///
/// With `TSGATE_DEMOS_USE_MOCK` set, both are served from the synthetic plant
/// registry (predictions are the real signal plus a little noise). Otherwise
/// the HTTP presets are used, overridable through `TSGATE_TWIN_*` and
/// `TSGATE_MODEL_*` variables.
///
/// # Errors
/// Returns `InvalidInput` for a malformed provider configuration.
pub fn get_providers() -> Result<(Arc<dyn ValueProvider>, Arc<dyn ValueProvider>), GatewayError> {
    if std::env::var("TSGATE_DEMOS_USE_MOCK").is_ok() {
        println!("--- (Using mock providers) ---");
        let registry = Arc::new(GeneratorRegistry::plant()?);
        let real = RegistryProvider::new("digital-twin", Arc::clone(&registry));
        let predicted = RegistryProvider::new("prediction-model", registry).with_noise(0.75);
        return Ok((Arc::new(real), Arc::new(predicted)));
    }
    let twin = HttpProviderConfig::from_env(
        "TSGATE_TWIN",
        HttpProviderConfig::digital_twin("http://localhost:8001"),
    )?;
    let model = HttpProviderConfig::from_env(
        "TSGATE_MODEL",
        HttpProviderConfig::prediction_model("http://localhost:8002"),
    )?;
    Ok((
        Arc::new(HttpValueProvider::new(twin)?),
        Arc::new(HttpValueProvider::new(model)?),
    ))
}

/// PostgreSQL store when `DATABASE_URL` is set, in-memory otherwise.
///
/// # Errors
/// Returns `Storage` if the database cannot be reached.
pub async fn get_store() -> Result<Arc<dyn SeriesStore>, GatewayError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Ok(Arc::new(PgSeriesStore::connect(&url).await?)),
        Err(_) => Ok(Arc::new(MemorySeriesStore::new())),
    }
}

/// A gateway wired from [`get_store`] and [`get_providers`].
///
/// # Errors
/// Propagates setup failures from the store or providers.
pub async fn get_gateway() -> Result<Gateway, GatewayError> {
    let (real, predicted) = get_providers()?;
    Gateway::builder()
        .with_store(get_store().await?)
        .real_provider(real)
        .predicted_provider(predicted)
        .build()
}
