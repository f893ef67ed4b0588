//! # Parking Allocator
//!
//! Routing and slot-allocation engine for a small parking lot with a fixed
//! topology.
//!
//! The lot is a weighted undirected graph of an entrance, junctions and slots.
//! On top of it this crate provides:
//!
//! - **Shortest paths**: Dijkstra from any node, with optional impassable nodes
//! - **Alternate routes**: up to K simple paths between two nodes, cheapest first
//! - **Allocation**: the nearest free slot and the route to it
//! - **Slot state**: free / occupied / booked, with booking expiry and a
//!   guard that keeps a stray sensor reading from freeing a booked slot
//! - **Persistence**: every committed mutation is written before it becomes
//!   visible, so a restart recovers the last committed state
//! - **Gate decisions**: credential lookup, routing pre-booked vehicles to
//!   their slot and everyone else to the nearest free one
//!
//! ## Quick start
//!
//! ```rust
//! use parking_allocator::builders::LotBuilder;
//! use parking_allocator::config::LotConfig;
//! use parking_allocator::core::{BookingRequest, SlotStatus};
//! use parking_allocator::util::clock::{now_ms, HOUR_MS};
//!
//! let lot = LotBuilder::new(LotConfig::default()).build(now_ms()).unwrap();
//!
//! let allocation = lot.allocate_nearest("ENTRANCE").unwrap().unwrap();
//! assert_eq!(allocation.slot_id, "S4");
//!
//! let now = now_ms();
//! let request = BookingRequest {
//!     vehicle_type: "car".into(),
//!     vehicle_number: "ABC-1234".into(),
//!     start_ms: now,
//!     end_ms: now + HOUR_MS,
//!     billed_hours: 1,
//!     cost: 50.0,
//! };
//! let slot = lot.book(&allocation.slot_id, request, now).unwrap();
//! assert_eq!(slot.status, SlotStatus::Booked);
//! ```
//!
//! Alternate routes for display:
//!
//! ```rust
//! # use parking_allocator::builders::LotBuilder;
//! # use parking_allocator::config::LotConfig;
//! let lot = LotBuilder::new(LotConfig::default()).build(0).unwrap();
//! let routes = lot.get_alternate_routes("ENTRANCE", "S9", 3).unwrap();
//! assert!(routes.windows(2).all(|w| w[0].weight <= w[1].weight));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Graph model, path engines, slot state machine and gate decisions.
pub mod core;
/// Configuration models for layout, credentials, storage and timers.
pub mod config;
/// Builders to construct the service from configuration.
pub mod builders;
/// Storage backends for slot state.
pub mod infra;
/// Service facade and background workers.
pub mod runtime;
/// Shared utilities.
pub mod util;
