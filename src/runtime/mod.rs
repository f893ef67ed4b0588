//! Service facade and background workers.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod sweeper;

pub use api::{Health, ParkingLot};
#[cfg(feature = "tokio-runtime")]
pub use sweeper::{spawn_expiry_sweeper, SweeperHandle};
