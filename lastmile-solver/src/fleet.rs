//! Multi-vehicle allocation: bin packing plus route-per-bin.
//!
//! First-fit-decreasing over vehicle capacity: the largest vehicles are
//! filled first, each by a greedy scan of the remaining deliveries in input
//! order. A delivery that would overflow the running set is skipped for
//! this vehicle but stays eligible for later ones, since smaller parcels behind
//! it may still fit. Whatever is left after every vehicle has been packed
//! is reported as unassigned, not raised as an error: the request still
//! succeeds and operators can provision more vehicles.

use lastmile_core::{fits, Coordinate, Delivery, DeliveryId, Route, RouteError, RouteId, Vehicle};

use crate::constructor::{RouteConstructor, Strategy};

/// The outcome of one allocation run.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetPlan {
    /// One planned route per vehicle that received deliveries.
    pub routes: Vec<Route>,
    /// Deliveries no available vehicle could take, in input order.
    pub unassigned: Vec<DeliveryId>,
}

impl FleetPlan {
    /// A plan with no routes and nothing unassigned.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            routes: Vec::new(),
            unassigned: Vec::new(),
        }
    }

    /// Total number of deliveries placed on routes.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(Route::stop_count).sum()
    }
}

/// Partitions deliveries across a fleet and builds a route per vehicle.
#[derive(Debug, Clone, Default)]
pub struct FleetAllocator {
    constructor: RouteConstructor,
}

impl FleetAllocator {
    /// Allocator with default travel assumptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator reusing an existing [`RouteConstructor`].
    #[must_use]
    pub const fn with_constructor(constructor: RouteConstructor) -> Self {
        Self { constructor }
    }

    /// Partition `deliveries` across the available subset of `vehicles` and
    /// construct each vehicle's route under `strategy`.
    ///
    /// `route_ids` supplies an identifier per constructed route, letting the
    /// caller reserve ids from its store. An empty delivery list yields an
    /// empty plan; a fleet with no usable vehicle reports every delivery as
    /// unassigned.
    ///
    /// # Errors
    /// Returns [`RouteError`] if a constructed route violates the waypoint
    /// invariants (duplicate delivery ids in the input).
    pub fn allocate(
        &self,
        deliveries: &[Delivery],
        vehicles: &[Vehicle],
        depot: Coordinate,
        strategy: Strategy,
        mut route_ids: impl FnMut() -> RouteId,
    ) -> Result<FleetPlan, RouteError> {
        if deliveries.is_empty() {
            return Ok(FleetPlan::empty());
        }

        let mut candidates: Vec<&Vehicle> = vehicles.iter().filter(|v| v.is_available()).collect();
        // Largest capacity first; stable sort keeps input order on ties.
        candidates.sort_by(|a, b| {
            b.capacity_weight_kg
                .total_cmp(&a.capacity_weight_kg)
                .then(b.capacity_volume_m3.total_cmp(&a.capacity_volume_m3))
        });

        let mut remaining: Vec<Delivery> = deliveries.to_vec();
        let mut routes = Vec::new();

        for vehicle in candidates {
            if remaining.is_empty() {
                break;
            }
            let bin = pack_first_fit(&mut remaining, vehicle);
            if bin.is_empty() {
                log::debug!("vehicle {} received no deliveries", vehicle.id);
                continue;
            }
            let route =
                self.constructor
                    .construct(route_ids(), &bin, vehicle, depot, strategy)?;
            routes.push(route);
        }

        if !remaining.is_empty() {
            log::warn!(
                "{} deliveries could not be placed on any available vehicle",
                remaining.len()
            );
        }
        Ok(FleetPlan {
            routes,
            unassigned: remaining.into_iter().map(|d| d.id).collect(),
        })
    }
}

/// Greedily move deliveries from `remaining` into a bin for `vehicle`,
/// scanning the whole list so parcels behind an oversized one still get a
/// chance.
fn pack_first_fit(remaining: &mut Vec<Delivery>, vehicle: &Vehicle) -> Vec<Delivery> {
    let mut bin: Vec<Delivery> = Vec::new();
    let mut leftover: Vec<Delivery> = Vec::with_capacity(remaining.len());

    for delivery in remaining.drain(..) {
        bin.push(delivery);
        if !fits(&bin, vehicle) {
            // Undo: this one overflows the running set.
            if let Some(rejected) = bin.pop() {
                leftover.push(rejected);
            }
        }
    }
    *remaining = leftover;
    bin
}

#[cfg(test)]
mod tests {
    use super::*;
    use lastmile_core::test_support::{
        assignment_fits, coordinate, parcel_at, parcel_with_load, van,
    };
    use lastmile_core::VehicleStatus;

    fn allocate(deliveries: &[Delivery], vehicles: &[Vehicle]) -> FleetPlan {
        let mut next_id = 0;
        FleetAllocator::new()
            .allocate(
                deliveries,
                vehicles,
                coordinate(0.0, 0.0),
                Strategy::Distance,
                move || {
                    next_id += 1;
                    next_id
                },
            )
            .expect("allocation succeeds")
    }

    #[test]
    fn no_deliveries_yield_an_empty_plan() {
        assert_eq!(allocate(&[], &[van(1, 10.0, 1.0)]), FleetPlan::empty());
    }

    #[test]
    fn an_empty_fleet_reports_every_delivery_unassigned() {
        let deliveries = vec![parcel_at(1, 0.0, 1.0), parcel_at(2, 0.0, 2.0)];
        let plan = allocate(&deliveries, &[]);
        assert!(plan.routes.is_empty());
        assert_eq!(plan.unassigned, vec![1, 2]);
    }

    #[test]
    fn forty_kg_parcels_leave_exactly_one_unassigned_on_a_hundred_kg_van() {
        let deliveries = vec![
            parcel_with_load(1, 40.0, 0.1),
            parcel_with_load(2, 40.0, 0.1),
            parcel_with_load(3, 40.0, 0.1),
        ];
        let plan = allocate(&deliveries, &[van(1, 100.0, 10.0)]);
        assert_eq!(plan.assigned_count(), 2);
        assert_eq!(plan.unassigned, vec![3]);
    }

    #[test]
    fn scanning_continues_past_an_oversized_delivery() {
        let deliveries = vec![
            parcel_with_load(1, 60.0, 0.1),
            parcel_with_load(2, 90.0, 0.1), // overflows, skipped
            parcel_with_load(3, 30.0, 0.1), // still fits afterwards
        ];
        let plan = allocate(&deliveries, &[van(1, 100.0, 10.0)]);
        let route = plan.routes.first().expect("one route");
        let mut ids: Vec<_> = route.delivery_ids().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(plan.unassigned, vec![2]);
    }

    #[test]
    fn largest_vehicle_is_packed_first() {
        let deliveries = vec![parcel_with_load(1, 500.0, 0.1)];
        let vehicles = vec![van(1, 100.0, 10.0), van(2, 800.0, 10.0)];
        let plan = allocate(&deliveries, &vehicles);
        let route = plan.routes.first().expect("one route");
        assert_eq!(route.vehicle_id, 2);
    }

    #[test]
    fn unavailable_vehicles_are_never_used() {
        let mut big = van(1, 800.0, 10.0);
        big.status = VehicleStatus::Maintenance;
        let deliveries = vec![parcel_with_load(1, 500.0, 0.1)];
        let plan = allocate(&deliveries, &[big, van(2, 100.0, 10.0)]);
        assert!(plan.routes.is_empty());
        assert_eq!(plan.unassigned, vec![1]);
    }

    #[test]
    fn a_delivery_heavier_than_every_vehicle_is_surfaced_not_retried() {
        let deliveries = vec![parcel_with_load(1, 2000.0, 0.1), parcel_with_load(2, 5.0, 0.1)];
        let plan = allocate(&deliveries, &[van(1, 100.0, 10.0), van(2, 50.0, 5.0)]);
        assert_eq!(plan.unassigned, vec![1]);
        assert_eq!(plan.assigned_count(), 1);
    }

    #[test]
    fn final_assignments_always_satisfy_the_capacity_validator() {
        let deliveries: Vec<Delivery> = (1..=9)
            .map(|i| parcel_with_load(i, f64::from(u32::try_from(i).unwrap_or(0)) * 7.0, 0.2))
            .collect();
        let vehicles = vec![van(1, 100.0, 10.0), van(2, 60.0, 1.0)];
        let plan = allocate(&deliveries, &vehicles);
        for route in &plan.routes {
            let vehicle = vehicles
                .iter()
                .find(|v| v.id == route.vehicle_id)
                .expect("known vehicle");
            let assigned: Vec<Delivery> = route
                .delivery_ids()
                .filter_map(|id| deliveries.iter().find(|d| d.id == id).cloned())
                .collect();
            assert!(assignment_fits(&assigned, vehicle));
        }
    }

    #[test]
    fn deliveries_split_across_vehicles_cover_the_input_exactly_once() {
        let deliveries: Vec<Delivery> = (1..=6)
            .map(|i| {
                let mut d = parcel_at(i, 0.0, f64::from(u32::try_from(i).unwrap_or(0)) * 0.5);
                d.weight_kg = Some(30.0);
                d
            })
            .collect();
        let vehicles = vec![van(1, 100.0, 10.0), van(2, 100.0, 10.0)];
        let plan = allocate(&deliveries, &vehicles);
        let mut seen: Vec<DeliveryId> = plan
            .routes
            .iter()
            .flat_map(Route::delivery_ids)
            .chain(plan.unassigned.iter().copied())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=6).collect::<Vec<_>>());
    }
}
