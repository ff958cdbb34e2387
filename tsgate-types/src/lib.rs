//! tsgate-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod connector;
mod error;
mod reports;
mod series;
mod stream;

pub use config::GatewayConfig;
pub use connector::ProviderKey;
pub use error::GatewayError;
pub use reports::{FailureStage, SeriesReport, StreamFailure};
pub use series::{
    CombinedPoint, FetchRequest, StoredRecord, ValuePoint, Window, truncate_to_minute,
};
pub use stream::StreamKind;
