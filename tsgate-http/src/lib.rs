//! tsgate-http
//!
//! [`ValueProvider`](tsgate_core::ValueProvider) implementations that talk to
//! upstream services over HTTP.
//!
//! One [`HttpValueProvider`] is created per stream: the digital twin serves
//! real values and the prediction model serves predicted values. Both are
//! plain `GET` endpoints taking the series identifier and a UTC window; they
//! differ only in parameter names and response shape, captured by
//! [`WireFormat`].
//!
//! Every call is a single attempt bounded by the configured timeout. Failures
//! are mapped onto `GatewayError` as follows:
//!
//! - transport errors and timeouts: `Connection`
//! - non-2xx status: `UpstreamStatus` carrying up to 200 characters of body
//! - unreadable or mis-shaped bodies: `Schema`
//! - anything else: `Unknown`
#![warn(missing_docs)]

mod client;
mod config;
mod wire;

pub use client::HttpValueProvider;
pub use config::{HttpProviderConfig, WireFormat};
pub use wire::{parse_body, parse_timestamp};
