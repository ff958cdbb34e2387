use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use regex::Regex;
use tsgate_core::GatewayError;

/// A sensor value generator: minute instant and a seeded RNG in, value out.
pub type GeneratorFn = Arc<dyn Fn(DateTime<Utc>, &mut StdRng) -> f64 + Send + Sync>;

struct Entry {
    pattern: String,
    matcher: Regex,
    generate: GeneratorFn,
}

/// Ordered `(pattern, generator)` table.
///
/// Patterns must match the whole identifier. Resolution walks the table in
/// registration order and returns the first hit, so more specific patterns
/// belong earlier.
#[derive(Default)]
pub struct GeneratorRegistry {
    entries: Vec<Entry>,
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .finish()
    }
}

impl GeneratorRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generator for identifiers fully matching `pattern`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `pattern` is not a valid regular expression.
    pub fn register<F>(&mut self, pattern: &str, generate: F) -> Result<&mut Self, GatewayError>
    where
        F: Fn(DateTime<Utc>, &mut StdRng) -> f64 + Send + Sync + 'static,
    {
        let matcher = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            GatewayError::InvalidInput(format!("invalid generator pattern {pattern:?}: {e}"))
        })?;
        self.entries.push(Entry {
            pattern: pattern.to_string(),
            matcher,
            generate: Arc::new(generate),
        });
        Ok(self)
    }

    /// First generator whose pattern fully matches `series_id`.
    #[must_use]
    pub fn resolve(&self, series_id: &str) -> Option<&GeneratorFn> {
        let hit = self.entries.iter().find(|e| e.matcher.is_match(series_id));
        #[cfg(feature = "tracing")]
        match hit {
            Some(e) => tracing::trace!(series_id, pattern = %e.pattern, "generator resolved"),
            None => tracing::debug!(series_id, "no generator registered"),
        }
        hit.map(|e| &e.generate)
    }

    /// Deterministic value of `series_id` at `ts`, if a generator matches.
    #[must_use]
    pub fn sample(&self, series_id: &str, ts: DateTime<Utc>) -> Option<f64> {
        let generate = self.resolve(series_id)?;
        let mut rng = seeded_rng(series_id, ts, 0);
        Some(generate(ts, &mut rng))
    }

    /// Registered patterns in resolution order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.pattern.as_str())
    }

    /// Number of registered generators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// RNG seeded from the identifier, the instant and a salt, so that the same
/// minute of the same sensor always yields the same value.
pub(crate) fn seeded_rng(series_id: &str, ts: DateTime<Utc>, salt: u64) -> StdRng {
    // FNV-1a keeps the seed stable across builds and platforms.
    let minute = ts.timestamp().div_euclid(60);
    let h = series_id
        .bytes()
        .chain([0xff])
        .chain(minute.to_le_bytes())
        .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
    StdRng::seed_from_u64(h ^ salt)
}
