use async_trait::async_trait;

use crate::{FetchRequest, GatewayError, ProviderKey, ValuePoint};

/// Upstream producer of one value stream (real or predicted) for a series.
///
/// Implementations make a single attempt per call; retry policy, if any,
/// belongs to the caller. Errors must use the provider-facing variants of
/// [`GatewayError`]:
///
/// - `Connection` for transport failures and timeouts,
/// - `UpstreamStatus` for non-success responses (404 means "no data"),
/// - `Schema` for responses that do not match the expected shape,
/// - `Unknown` for everything else.
#[async_trait]
pub trait ValueProvider: Send + Sync {
    /// A stable identifier used in logs and diagnostics (e.g. "digital-twin").
    fn name(&self) -> &'static str;

    /// Canonical key constructed from the static name.
    fn key(&self) -> ProviderKey {
        ProviderKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Fetch the value points of `req.series_id` inside `req.window`.
    ///
    /// Returned points are ordered by timestamp ascending. An empty vector is
    /// a valid answer.
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<ValuePoint>, GatewayError>;
}
