//! tsgate reconciles sensor time-series from a persistent store with two
//! independent, unreliable upstream providers.
//!
//! Overview
//! - The store holds one record per `(series_id, minute)` with a real and a
//!   predicted value, each independently optional.
//! - For a requested window the gateway loads what is stored, works out which
//!   streams have gaps, fetches only those streams (concurrently), writes the
//!   fresh values back field by field, and returns one point per minute.
//!
//! Key behaviors and trade-offs
//! - Gap detection is per stream and window-wide: if any minute lacks a
//!   predicted value, predictions are fetched for the whole window. This costs
//!   some redundant upstream volume for a much simpler provider contract.
//! - Failures after input validation never fail the request. A store read
//!   failure, a provider error or timeout, and a failed write-back are each
//!   recorded as a [`StreamFailure`] and summarized in the report message.
//! - Persistence is best effort: the response reflects fetched values even
//!   when they could not be saved.
//! - There is no cross-request coordination. Overlapping requests may fetch and
//!   write the same minutes; the field-selective upsert makes that redundant
//!   rather than incorrect.
//! - Dropping the returned future cancels in-flight fetches. Writes that have
//!   already completed are kept.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tsgate::Gateway;
//!
//! let gateway = Gateway::builder()
//!     .with_store(Arc::new(store))
//!     .real_provider(Arc::new(digital_twin))
//!     .predicted_provider(Arc::new(prediction_model))
//!     .predicted_timeout(Duration::from_secs(120))
//!     .build()?;
//!
//! let report = gateway.series("ActivePower", start, end).await?;
//! println!("{}: {} points", report.message, report.points.len());
//! ```
#![warn(missing_docs)]

mod core;
mod router;

pub use crate::core::{Gateway, GatewayBuilder};

pub use tsgate_core::{
    CombinedPoint, FailureStage, FetchRequest, GatewayConfig, GatewayError, SeriesReport,
    SeriesStore, StoredRecord, StreamFailure, StreamKind, ValuePoint, ValueProvider, Window,
};
