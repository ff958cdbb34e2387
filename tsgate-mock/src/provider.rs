use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tsgate_core::{FetchRequest, GatewayError, ValuePoint, ValueProvider, window_timestamps};

use crate::GeneratorRegistry;
use crate::registry::seeded_rng;

const PERTURB_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Value provider backed by a shared [`GeneratorRegistry`].
///
/// Emits one value per minute of the request window. Identifiers without a
/// generator are answered with a 404 status, like the digital twin does.
///
/// With an offset or noise it doubles as a stand-in predicted-value
/// provider that tracks the synthetic "real" signal.
#[derive(Debug, Clone)]
pub struct RegistryProvider {
    name: &'static str,
    registry: Arc<GeneratorRegistry>,
    offset: f64,
    noise: f64,
}

impl RegistryProvider {
    /// Provider named `name` resolving identifiers against `registry`.
    #[must_use]
    pub const fn new(name: &'static str, registry: Arc<GeneratorRegistry>) -> Self {
        Self {
            name,
            registry,
            offset: 0.0,
            noise: 0.0,
        }
    }

    /// Add a constant to every generated value.
    #[must_use]
    pub const fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Add deterministic uniform noise in `[-amplitude, amplitude]`.
    #[must_use]
    pub fn with_noise(mut self, amplitude: f64) -> Self {
        self.noise = amplitude.abs();
        self
    }
}

#[async_trait]
impl ValueProvider for RegistryProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "GeneratorRegistry"
    }

    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<ValuePoint>, GatewayError> {
        let id = req.series_id.as_str();
        let generate = self.registry.resolve(id).ok_or_else(|| {
            GatewayError::upstream_status(self.name, 404, format!("Sensor '{id}' not found"))
        })?;
        let points = window_timestamps(&req.window)
            .into_iter()
            .map(|ts| {
                let mut rng = seeded_rng(id, ts, 0);
                let mut v = generate(ts, &mut rng) + self.offset;
                if self.noise > 0.0 {
                    let mut rng = seeded_rng(id, ts, PERTURB_SALT);
                    v += rng.random_range(-self.noise..=self.noise);
                }
                ValuePoint::new(ts, v)
            })
            .collect();
        Ok(points)
    }
}
