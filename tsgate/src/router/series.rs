use std::time::Duration;

use chrono::{DateTime, TimeZone};
use futures::future::OptionFuture;
use tokio::time::Instant;
use tsgate_core::{
    FetchRequest, GatewayError, SeriesReport, StreamFailure, StreamKind, ValuePoint, Window,
    apply_stream, fill_grid, find_gaps_in, index_records, normalize_points, window_timestamps,
};

use crate::Gateway;

type FetchOutcome = Option<Result<Vec<ValuePoint>, GatewayError>>;

impl Gateway {
    /// Reconciled series for `[start, end]` with both streams.
    ///
    /// Bounds are normalized to UTC and truncated to the minute. The report
    /// contains exactly one point per expected minute in ascending order; any
    /// store or provider trouble is listed in `warnings` and summarized in
    /// `message`.
    ///
    /// # Errors
    /// Returns `InvalidInput` when `start >= end` or `series_id` is blank.
    /// No other error is returned.
    pub async fn series<Tz: TimeZone>(
        &self,
        series_id: &str,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<SeriesReport, GatewayError> {
        let window = Window::new(start, end)?;
        self.series_in(series_id, window).await
    }

    /// Like [`series`](Self::series) over an already validated window.
    ///
    /// # Errors
    /// Returns `InvalidInput` when `series_id` is blank.
    pub async fn series_in(
        &self,
        series_id: &str,
        window: Window,
    ) -> Result<SeriesReport, GatewayError> {
        validate_series_id(series_id)?;
        Ok(self.reconcile(series_id, window, &StreamKind::ALL).await)
    }

    /// Reconciled series for `[start, end]` filling only `stream`.
    ///
    /// Only the selected stream is gap-checked, fetched and written back; the
    /// other field is returned as stored.
    ///
    /// # Errors
    /// Returns `InvalidInput` when `start >= end` or `series_id` is blank.
    pub async fn stream_series<Tz: TimeZone>(
        &self,
        series_id: &str,
        stream: StreamKind,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<SeriesReport, GatewayError> {
        let window = Window::new(start, end)?;
        validate_series_id(series_id)?;
        Ok(self.reconcile(series_id, window, &[stream]).await)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "tsgate::router",
            skip(self, window),
            fields(start = %window.start(), end = %window.end()),
        )
    )]
    async fn reconcile(
        &self,
        series_id: &str,
        window: Window,
        scope: &[StreamKind],
    ) -> SeriesReport {
        let mut warnings = Vec::new();

        let stored = match self.store.read_range(series_id, &window).await {
            Ok(records) => records,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(store = self.store.name(), error = %e, "load failed; continuing without stored data");
                warnings.push(StreamFailure::load(e));
                Vec::new()
            }
        };
        let mut index = index_records(stored);
        let expected = window_timestamps(&window);
        let gaps = find_gaps_in(&expected, &index);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            expected = expected.len(),
            missing_real = gaps.missing_real,
            missing_predicted = gaps.missing_predicted,
            "gap analysis"
        );

        let wanted = |s: StreamKind| scope.contains(&s) && gaps.needs(s);
        let req = FetchRequest::new(series_id, window);
        let (real, predicted) = self
            .fetch_missing(&req, wanted(StreamKind::Real), wanted(StreamKind::Predicted))
            .await;

        for (stream, outcome) in [(StreamKind::Real, real), (StreamKind::Predicted, predicted)] {
            match outcome {
                None => {}
                Some(Err(e)) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(stream = %stream, provider = self.provider(stream).name(), error = %e, "fetch failed");
                    warnings.push(StreamFailure::fetch(stream, e));
                }
                Some(Ok(points)) => {
                    let points = normalize_points(points, &window);
                    if self.cfg.persist_fetched && !points.is_empty() {
                        match self.store.upsert_field(series_id, stream, &points).await {
                            Ok(_written) => {
                                #[cfg(feature = "tracing")]
                                tracing::info!(stream = %stream, written = _written, "persisted fetched points");
                            }
                            Err(e) => {
                                #[cfg(feature = "tracing")]
                                tracing::warn!(stream = %stream, error = %e, "persist failed; serving unsaved values");
                                warnings.push(StreamFailure::persist(stream, e));
                            }
                        }
                    }
                    apply_stream(&mut index, stream, &points);
                }
            }
        }

        SeriesReport::new(series_id, fill_grid(&index, &expected), warnings)
    }

    /// Fetch the requested streams concurrently and wait for both to settle.
    ///
    /// A stream that is not requested yields `None`. Each stream is bounded by
    /// its own timeout and, when configured, by the shared request deadline.
    async fn fetch_missing(
        &self,
        req: &FetchRequest,
        real: bool,
        predicted: bool,
    ) -> (FetchOutcome, FetchOutcome) {
        let deadline = self.cfg.request_timeout.map(|t| (Instant::now() + t, t));
        let real: OptionFuture<_> = real
            .then(|| self.fetch_stream(StreamKind::Real, req, deadline))
            .into();
        let predicted: OptionFuture<_> = predicted
            .then(|| self.fetch_stream(StreamKind::Predicted, req, deadline))
            .into();
        tokio::join!(real, predicted)
    }

    async fn fetch_stream(
        &self,
        stream: StreamKind,
        req: &FetchRequest,
        deadline: Option<(Instant, Duration)>,
    ) -> Result<Vec<ValuePoint>, GatewayError> {
        let provider = self.provider(stream);
        let name = provider.name();
        let call = Self::provider_call_with_timeout(
            name,
            self.cfg.timeout_for(stream),
            provider.fetch(req),
        );
        match deadline {
            None => call.await,
            Some((at, limit)) => tokio::time::timeout_at(at, call).await.unwrap_or_else(|_| {
                Err(GatewayError::connection(
                    name,
                    format!("request deadline of {}ms exceeded", limit.as_millis()),
                ))
            }),
        }
    }
}

fn validate_series_id(series_id: &str) -> Result<(), GatewayError> {
    if series_id.trim().is_empty() {
        return Err(GatewayError::InvalidInput(
            "series identifier must not be empty".to_string(),
        ));
    }
    Ok(())
}
