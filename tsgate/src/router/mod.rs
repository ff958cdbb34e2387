//! Request entry points of the gateway.
pub mod series;
