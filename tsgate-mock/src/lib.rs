//! tsgate-mock
//!
//! Value providers that need no network, for tests and demos.
//!
//! - [`GeneratorRegistry`] + [`RegistryProvider`]: synthetic plant sensors.
//!   The registry is built once and shared by `Arc`; identifiers are matched
//!   against full-match regular expressions in registration order and the
//!   first match wins.
//! - [`DynamicMockProvider`] + [`DynamicMockController`]: per-series scripted
//!   behavior (return, fail, hang) with a call log, for orchestrator tests.
#![warn(missing_docs)]

mod dynamic;
mod generators;
mod provider;
mod registry;

pub use dynamic::{DynamicMockController, DynamicMockProvider, MockBehavior};
pub use provider::RegistryProvider;
pub use registry::{GeneratorFn, GeneratorRegistry};
