//! Configuration models for the lot layout, credentials, storage and timers.

pub mod lot;

pub use lot::{EdgeSpec, LayoutConfig, LotConfig, NodeSpec, StoreBackendConfig};
