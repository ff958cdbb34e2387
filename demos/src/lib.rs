//! Shared setup for the tsgate demo programs.
pub mod common;
