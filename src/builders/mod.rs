//! Builders to assemble a parking lot service from configuration.

pub mod lot_builder;

pub use lot_builder::{build_backend, build_graph, LotBuilder};
