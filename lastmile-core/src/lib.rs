//! Core domain types for the lastmile delivery engine.
//!
//! This crate holds the validated building blocks the solver and scorer
//! crates operate on: coordinates and great-circle distance, deliveries and
//! vehicles with explicit status state machines, routes with owned waypoint
//! sequences, capacity validation, and the persistence boundary traits.
//! Constructors return `Result` to surface invalid input early; parsing a
//! status from text fails on unknown names rather than defaulting.
//!
//! Everything here is a pure value type or a pure function, with no I/O,
//! clocks or randomness, so optimisation requests can run concurrently
//! without shared mutable state.

#![forbid(unsafe_code)]

pub mod capacity;
pub mod coordinate;
pub mod delivery;
pub mod distance;
pub mod route;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod vehicle;

pub use capacity::fits;
pub use coordinate::{Coordinate, CoordinateError};
pub use delivery::{
    Delivery, DeliveryId, DeliveryParseError, DeliveryStatus, InvalidDeliveryTransition, Priority,
};
pub use distance::{haversine_km, leg_km, TravelModel, EARTH_RADIUS_KM, PENALTY_KM};
pub use route::{Route, RouteError, RouteId, RouteStatus, Waypoint};
pub use store::{DispatchStore, PlanCommit, StoreError, StoreVersion};
pub use vehicle::{UnknownVehicleStatus, Vehicle, VehicleId, VehicleStatus};
