//! Time-series utilities shared by stores, providers and the orchestrator.
//!
//! Modules include:
//! - `grid`: the expected minute-aligned instants of a window
//! - `gaps`: decide which streams are missing from stored data
//! - `merge`: field-selective in-memory merge and gap-free grid fill
/// Expected minute grid helpers.
pub mod grid;
/// Gap analysis against the expected grid.
pub mod gaps;
/// Field-selective merge and grid fill.
pub mod merge;
