//! Re-export of foundational types from `tsgate-types`.
// Consolidated re-exports so downstream crates can depend on `tsgate-core` only

pub use tsgate_types::{
    CombinedPoint, FailureStage, FetchRequest, GatewayConfig, GatewayError, ProviderKey,
    SeriesReport, StoredRecord, StreamFailure, StreamKind, ValuePoint, Window, truncate_to_minute,
};

pub use chrono::{DateTime, Utc};
