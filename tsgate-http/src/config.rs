use std::time::Duration;

use serde::{Deserialize, Serialize};
use tsgate_core::GatewayError;
use url::Url;

/// Response shape and query parameter names of an upstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// Digital twin: `?sensorName=..`, body
    /// `{"sensorName": .., "data": [{"timestamp": .., "value": ..}], "message": ..}`.
    SensorEnvelope,
    /// Prediction model: `?sensorId=..`, body
    /// `[{"timestamp": .., "sensorId": .., "predicted_value": ..}]`.
    PredictionList,
}

impl WireFormat {
    /// Query parameter carrying the series identifier.
    #[must_use]
    pub const fn id_param(self) -> &'static str {
        match self {
            Self::SensorEnvelope => "sensorName",
            Self::PredictionList => "sensorId",
        }
    }
}

/// Connection settings for one HTTP value provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProviderConfig {
    /// Stable provider name used in errors and logs.
    pub name: &'static str,
    /// Scheme, host and optional port, e.g. `http://digital-twin:8001`.
    pub base_url: String,
    /// Path appended to `base_url`.
    pub endpoint: String,
    /// Upper bound for one request, connect through body.
    pub timeout: Duration,
    /// Request/response shape.
    pub wire: WireFormat,
}

impl HttpProviderConfig {
    /// Real-value provider served by the digital twin.
    pub fn digital_twin(base_url: impl Into<String>) -> Self {
        Self {
            name: "digital-twin",
            base_url: base_url.into(),
            endpoint: "/api/v1/sensor/data/generate".to_string(),
            timeout: Duration::from_secs(10),
            wire: WireFormat::SensorEnvelope,
        }
    }

    /// Predicted-value provider served by the prediction model.
    ///
    /// Inference is iterative over the window, hence the long timeout.
    pub fn prediction_model(base_url: impl Into<String>) -> Self {
        Self {
            name: "prediction-model",
            base_url: base_url.into(),
            endpoint: "/predict/".to_string(),
            timeout: Duration::from_secs(900),
            wire: WireFormat::PredictionList,
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overlay `{prefix}_BASE_URL`, `{prefix}_ENDPOINT` and
    /// `{prefix}_TIMEOUT_SECS` from the process environment onto `preset`.
    ///
    /// Unset variables keep the preset's value.
    ///
    /// # Errors
    /// Returns `InvalidInput` when `{prefix}_TIMEOUT_SECS` is not a
    /// non-negative number.
    pub fn from_env(prefix: &str, preset: Self) -> Result<Self, GatewayError> {
        Self::from_lookup(prefix, preset, |k| std::env::var(k).ok())
    }

    pub(crate) fn from_lookup<F>(prefix: &str, mut cfg: Self, get: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get(&format!("{prefix}_BASE_URL")) {
            cfg.base_url = v;
        }
        if let Some(v) = get(&format!("{prefix}_ENDPOINT")) {
            cfg.endpoint = v;
        }
        let key = format!("{prefix}_TIMEOUT_SECS");
        if let Some(v) = get(&key) {
            let secs: f64 = v
                .trim()
                .parse()
                .map_err(|_| GatewayError::InvalidInput(format!("{key}: not a number: {v:?}")))?;
            cfg.timeout = Duration::try_from_secs_f64(secs)
                .map_err(|e| GatewayError::InvalidInput(format!("{key}: {e}")))?;
        }
        Ok(cfg)
    }

    /// The full endpoint URL.
    ///
    /// # Errors
    /// Returns `InvalidInput` when `base_url` + `endpoint` is not a valid
    /// absolute http(s) URL.
    pub fn endpoint_url(&self) -> Result<Url, GatewayError> {
        let raw = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        );
        let url = Url::parse(&raw)
            .map_err(|e| GatewayError::InvalidInput(format!("{}: bad url {raw:?}: {e}", self.name)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(GatewayError::InvalidInput(format!(
                "{}: unsupported scheme {other:?}",
                self.name
            ))),
        }
    }
}
