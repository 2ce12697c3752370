//! Route construction and fleet allocation for the lastmile engine.
//!
//! [`RouteConstructor`] turns one vehicle's deliveries into an ordered
//! visiting sequence using a greedy nearest-neighbour heuristic, optionally
//! constrained by priority buckets or costed in travel time instead of
//! distance. [`FleetAllocator`] partitions a delivery set across the
//! available fleet with a first-fit-decreasing bin-packing pass and builds a
//! route per vehicle.
//!
//! Both are deterministic pure functions over their inputs: ties fall back
//! to input order and no randomness is involved, so identical requests
//! produce identical plans.

#![forbid(unsafe_code)]

mod constructor;
mod fleet;

pub use constructor::{ConstructorConfig, RouteConstructor, Strategy, UnknownStrategy};
pub use fleet::{FleetAllocator, FleetPlan};
