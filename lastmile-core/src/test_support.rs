//! Test-only, in-memory [`DispatchStore`] implementation and fixture
//! builders used by unit and behaviour tests across the workspace.

use std::collections::BTreeMap;

use crate::capacity;
use crate::delivery::{Delivery, DeliveryId, Priority};
use crate::route::{Route, RouteId};
use crate::store::{DispatchStore, PlanCommit, StoreError, StoreVersion};
use crate::vehicle::{Vehicle, VehicleId};
use crate::Coordinate;

/// In-memory `DispatchStore` backed by ordered maps.
///
/// Iteration order follows ids, which keeps "input order" semantics
/// deterministic in tests. Intended only for small datasets.
#[derive(Debug, Default)]
pub struct MemoryStore {
    version: StoreVersion,
    deliveries: BTreeMap<DeliveryId, Delivery>,
    vehicles: BTreeMap<VehicleId, Vehicle>,
    routes: BTreeMap<RouteId, Route>,
    next_route_id: RouteId,
}

impl MemoryStore {
    /// Create an empty store at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a delivery.
    pub fn insert_delivery(&mut self, delivery: Delivery) {
        self.deliveries.insert(delivery.id, delivery);
    }

    /// Add or replace a vehicle.
    pub fn insert_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicles.insert(vehicle.id, vehicle);
    }

    /// Add or replace a route.
    pub fn insert_route(&mut self, route: Route) {
        self.routes.insert(route.id, route);
    }

    /// Simulate a concurrent writer by bumping the version.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }
}

impl DispatchStore for MemoryStore {
    fn version(&self) -> StoreVersion {
        self.version
    }

    fn available_vehicles(&self) -> Vec<Vehicle> {
        self.vehicles
            .values()
            .filter(|v| v.is_available())
            .cloned()
            .collect()
    }

    fn unassigned_deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .values()
            .filter(|d| d.status == crate::delivery::DeliveryStatus::Pending)
            .cloned()
            .collect()
    }

    fn delivery(&self, id: DeliveryId) -> Result<Delivery, StoreError> {
        self.deliveries
            .get(&id)
            .cloned()
            .ok_or(StoreError::DeliveryNotFound(id))
    }

    fn vehicle(&self, id: VehicleId) -> Result<Vehicle, StoreError> {
        self.vehicles
            .get(&id)
            .cloned()
            .ok_or(StoreError::VehicleNotFound(id))
    }

    fn route(&self, id: RouteId) -> Result<Route, StoreError> {
        self.routes
            .get(&id)
            .cloned()
            .ok_or(StoreError::RouteNotFound(id))
    }

    fn next_route_id(&mut self) -> RouteId {
        self.next_route_id += 1;
        self.next_route_id
    }

    fn commit(&mut self, commit: PlanCommit) -> Result<StoreVersion, StoreError> {
        if commit.expected_version != self.version {
            return Err(StoreError::ConcurrentModification {
                expected: commit.expected_version,
                found: self.version,
            });
        }
        // Validate every reference before touching any state.
        for (id, _) in &commit.delivery_status {
            if !self.deliveries.contains_key(id) {
                return Err(StoreError::DeliveryNotFound(*id));
            }
        }
        for (id, _) in &commit.vehicle_status {
            if !self.vehicles.contains_key(id) {
                return Err(StoreError::VehicleNotFound(*id));
            }
        }
        for id in &commit.retired_routes {
            if !self.routes.contains_key(id) {
                return Err(StoreError::RouteNotFound(*id));
            }
        }

        for id in &commit.retired_routes {
            self.routes.remove(id);
        }
        for route in commit.routes {
            self.routes.insert(route.id, route);
        }
        for (id, status) in commit.delivery_status {
            if let Some(delivery) = self.deliveries.get_mut(&id) {
                delivery.status = status;
            }
        }
        for (id, status) in commit.vehicle_status {
            if let Some(vehicle) = self.vehicles.get_mut(&id) {
                vehicle.status = status;
            }
        }
        self.version += 1;
        Ok(self.version)
    }
}

/// Build a coordinate, panicking on invalid input.
///
/// # Panics
/// Panics when the latitude or longitude is out of range; fixtures are
/// expected to be well-formed.
#[must_use]
pub fn coordinate(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).expect("fixture coordinate in range")
}

/// A pending, normal-priority parcel destined for (`latitude`, `longitude`).
#[must_use]
pub fn parcel_at(id: DeliveryId, latitude: f64, longitude: f64) -> Delivery {
    Delivery::new(
        id,
        Some(coordinate(latitude, longitude)),
        Some(1.0),
        Some(0.01),
        Priority::Normal,
    )
}

/// A pending parcel with explicit weight and volume and no destination.
#[must_use]
pub fn parcel_with_load(id: DeliveryId, weight_kg: f64, volume_m3: f64) -> Delivery {
    Delivery::new(id, None, Some(weight_kg), Some(volume_m3), Priority::Normal)
}

/// An available van with the given capacities.
#[must_use]
pub fn van(id: VehicleId, capacity_weight_kg: f64, capacity_volume_m3: f64) -> Vehicle {
    Vehicle::new(id, capacity_weight_kg, capacity_volume_m3)
}

/// Sanity check used by allocator tests: the final set assigned to a
/// vehicle must satisfy the capacity validator.
#[must_use]
pub fn assignment_fits(deliveries: &[Delivery], vehicle: &Vehicle) -> bool {
    capacity::fits(deliveries, vehicle)
}
