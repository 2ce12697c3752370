//! Persistence boundary for deliveries, vehicles and routes.
//!
//! The optimisation core never talks to a database directly; it reads a
//! snapshot through [`DispatchStore`], computes a plan and commits the
//! result atomically. Commits carry the snapshot version they were computed
//! against; if the store has moved on (say a vehicle was reassigned by a
//! concurrent request) the commit is rejected wholesale and the caller
//! recomputes. Plans are never partially applied.

use thiserror::Error;

use crate::delivery::{Delivery, DeliveryId, DeliveryStatus};
use crate::route::{Route, RouteId};
use crate::vehicle::{Vehicle, VehicleId, VehicleStatus};

/// Monotonic counter identifying a store snapshot.
pub type StoreVersion = u64;

/// Errors surfaced by a [`DispatchStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No delivery with the given id exists.
    #[error("delivery {0} not found")]
    DeliveryNotFound(DeliveryId),
    /// No vehicle with the given id exists.
    #[error("vehicle {0} not found")]
    VehicleNotFound(VehicleId),
    /// No route with the given id exists.
    #[error("route {0} not found")]
    RouteNotFound(RouteId),
    /// The store changed between snapshot and commit; nothing was applied.
    #[error("store changed concurrently: plan built at version {expected}, store at {found}")]
    ConcurrentModification {
        /// Version the plan was computed against.
        expected: StoreVersion,
        /// Version the store is at now.
        found: StoreVersion,
    },
}

/// The atomic write produced by one optimisation run.
///
/// Applied in full or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCommit {
    /// Snapshot version the plan was computed against.
    pub expected_version: StoreVersion,
    /// Newly planned routes, waypoints included.
    pub routes: Vec<Route>,
    /// Route ids superseded by this plan (reoptimisation replaces a route).
    pub retired_routes: Vec<RouteId>,
    /// Delivery status updates, usually `Pending` -> `Assigned`.
    pub delivery_status: Vec<(DeliveryId, DeliveryStatus)>,
    /// Vehicle status updates, usually `Available` -> `Assigned`.
    pub vehicle_status: Vec<(VehicleId, VehicleStatus)>,
}

impl PlanCommit {
    /// An empty commit against the given snapshot version.
    #[must_use]
    pub const fn against(expected_version: StoreVersion) -> Self {
        Self {
            expected_version,
            routes: Vec::new(),
            retired_routes: Vec::new(),
            delivery_status: Vec::new(),
            vehicle_status: Vec::new(),
        }
    }
}

/// Read-then-write contract between the optimisation core and persistence.
///
/// Reads return owned snapshots; the store may be shared and mutated by
/// other writers between calls, which is why [`DispatchStore::commit`]
/// revalidates the version.
pub trait DispatchStore {
    /// Current snapshot version.
    fn version(&self) -> StoreVersion;

    /// Vehicles currently free to take a route.
    fn available_vehicles(&self) -> Vec<Vehicle>;

    /// Deliveries not owned by any route.
    fn unassigned_deliveries(&self) -> Vec<Delivery>;

    /// Look up one delivery.
    ///
    /// # Errors
    /// [`StoreError::DeliveryNotFound`] for an unknown id.
    fn delivery(&self, id: DeliveryId) -> Result<Delivery, StoreError>;

    /// Look up one vehicle.
    ///
    /// # Errors
    /// [`StoreError::VehicleNotFound`] for an unknown id.
    fn vehicle(&self, id: VehicleId) -> Result<Vehicle, StoreError>;

    /// Look up one route.
    ///
    /// # Errors
    /// [`StoreError::RouteNotFound`] for an unknown id.
    fn route(&self, id: RouteId) -> Result<Route, StoreError>;

    /// Reserve an id for a route about to be planned.
    fn next_route_id(&mut self) -> RouteId;

    /// Apply a plan atomically.
    ///
    /// Returns the new snapshot version on success.
    ///
    /// # Errors
    /// [`StoreError::ConcurrentModification`] when the store version no
    /// longer matches `commit.expected_version`; lookup errors when the
    /// commit references unknown ids. In every error case the store is left
    /// untouched.
    fn commit(&mut self, commit: PlanCommit) -> Result<StoreVersion, StoreError>;
}
