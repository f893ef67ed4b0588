//! Infrastructure adapters for slot state storage.

pub mod store;

pub use store::{InMemoryBackend, JsonFileBackend};
