use async_trait::async_trait;
use tsgate_core::{FetchRequest, GatewayError, ValuePoint, ValueProvider};
use url::Url;

use crate::{HttpProviderConfig, parse_body};

const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const ERROR_BODY_LIMIT: usize = 200;

/// HTTP-backed value provider for one stream.
#[derive(Debug, Clone)]
pub struct HttpValueProvider {
    cfg: HttpProviderConfig,
    url: Url,
    client: reqwest::Client,
}

impl HttpValueProvider {
    /// Build a provider with its own `reqwest` client.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a malformed endpoint URL and `Unknown` if
    /// the HTTP client cannot be constructed.
    pub fn new(cfg: HttpProviderConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| GatewayError::unknown(cfg.name, e.to_string()))?;
        Self::with_client(cfg, client)
    }

    /// Build a provider on a shared `reqwest` client.
    ///
    /// The configured timeout is still applied per request.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a malformed endpoint URL.
    pub fn with_client(cfg: HttpProviderConfig, client: reqwest::Client) -> Result<Self, GatewayError> {
        let url = cfg.endpoint_url()?;
        Ok(Self { cfg, url, client })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpProviderConfig {
        &self.cfg
    }

    fn request_url(&self, req: &FetchRequest) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair(self.cfg.wire.id_param(), &req.series_id)
            .append_pair(
                "startDate",
                &req.window.start().format(API_TIME_FORMAT).to_string(),
            )
            .append_pair(
                "endDate",
                &req.window.end().format(API_TIME_FORMAT).to_string(),
            );
        url
    }

    fn map_transport(&self, e: &reqwest::Error) -> GatewayError {
        let name = self.cfg.name;
        if e.is_timeout() {
            GatewayError::provider_timeout(name, self.cfg.timeout)
        } else if e.is_connect() || e.is_request() || e.is_builder() || e.is_redirect() {
            GatewayError::connection(name, e.to_string())
        } else if e.is_body() || e.is_decode() {
            GatewayError::schema(name, e.to_string())
        } else {
            GatewayError::unknown(name, e.to_string())
        }
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

#[async_trait]
impl ValueProvider for HttpValueProvider {
    fn name(&self) -> &'static str {
        self.cfg.name
    }

    fn vendor(&self) -> &'static str {
        "http"
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tsgate_http::fetch",
            skip(self, req),
            fields(provider = self.cfg.name, series_id = %req.series_id),
        )
    )]
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<ValuePoint>, GatewayError> {
        let url = self.request_url(req);
        let resp = self
            .client
            .get(url)
            .timeout(self.cfg.timeout)
            .send()
            .await
            .map_err(|e| self.map_transport(&e))?;

        let status = resp.status();
        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::debug!(status = status.as_u16(), "upstream returned non-success status");
            // An unreadable error body must not hide the status.
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::upstream_status(
                self.cfg.name,
                status.as_u16(),
                truncate_body(&body),
            ));
        }

        let body = resp.text().await.map_err(|e| self.map_transport(&e))?;
        let points = parse_body(self.cfg.name, self.cfg.wire, &body)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(points = points.len(), "fetched");
        Ok(points)
    }
}
