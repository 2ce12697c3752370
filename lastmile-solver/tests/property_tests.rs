//! Property-based tests for route construction and fleet allocation.
//!
//! These assert invariants that must hold for all valid inputs,
//! complementing the concrete fixtures in `scenario_tests.rs`:
//!
//! - **Coverage:** every input delivery appears exactly once across the
//!   plan's waypoints and unassigned list, with no duplication and no loss.
//! - **Priority order:** under the priority strategy a strictly more urgent
//!   delivery is always visited earlier.
//! - **Capacity:** no vehicle's final assigned set ever fails the capacity
//!   validator.
//! - **Distance:** symmetry and the zero-identity of the haversine metric.

use proptest::prelude::*;

use lastmile_core::{fits, haversine_km, Coordinate, Delivery, Priority, Vehicle};
use lastmile_solver::{FleetAllocator, RouteConstructor, Strategy as OrderingStrategy};

fn priority_from_index(index: u8) -> Priority {
    match index % 5 {
        0 => Priority::Low,
        1 => Priority::Normal,
        2 => Priority::High,
        3 => Priority::Urgent,
        _ => Priority::Critical,
    }
}

prop_compose! {
    fn delivery_strategy(id: u64)(
        lat in -60.0..60.0f64,
        lon in -60.0..60.0f64,
        weight in 1.0..40.0f64,
        priority_index in 0u8..5,
        resolvable in prop::bool::weighted(0.9),
    ) -> Delivery {
        let destination = resolvable
            .then(|| Coordinate::new(lat, lon).expect("generated in range"));
        Delivery::new(
            id,
            destination,
            Some(weight),
            Some(0.05),
            priority_from_index(priority_index),
        )
    }
}

fn deliveries_strategy(max: u64) -> impl Strategy<Value = Vec<Delivery>> {
    (1..max).prop_flat_map(|len| (0..len).map(delivery_strategy).collect::<Vec<_>>())
}

fn depot() -> Coordinate {
    Coordinate::new(0.0, 0.0).expect("depot")
}

fn big_van(id: u64) -> Vehicle {
    Vehicle::new(id, 10_000.0, 1_000.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every input delivery id appears exactly once in the constructed
    /// route, whatever the strategy.
    #[test]
    fn construction_covers_every_delivery_exactly_once(
        deliveries in deliveries_strategy(20),
        strategy_index in 0usize..3,
    ) {
        let strategy = [
            OrderingStrategy::Distance,
            OrderingStrategy::Priority,
            OrderingStrategy::Time,
        ][strategy_index];
        let route = RouteConstructor::new()
            .construct(1, &deliveries, &big_van(1), depot(), strategy)
            .expect("construction succeeds");

        let mut routed: Vec<u64> = route.delivery_ids().collect();
        routed.sort_unstable();
        let mut expected: Vec<u64> = deliveries.iter().map(|d| d.id).collect();
        expected.sort_unstable();
        prop_assert_eq!(routed, expected);
    }

    /// Under the priority strategy, a strictly higher priority always gets
    /// a strictly smaller sequence index.
    #[test]
    fn priority_strategy_never_inverts_urgency(deliveries in deliveries_strategy(16)) {
        let route = RouteConstructor::new()
            .construct(1, &deliveries, &big_van(1), depot(), OrderingStrategy::Priority)
            .expect("construction succeeds");

        let priority_of = |id: u64| {
            deliveries
                .iter()
                .find(|d| d.id == id)
                .map(|d| d.priority)
                .expect("routed id came from the input")
        };
        for earlier in 0..route.waypoints.len() {
            for later in earlier + 1..route.waypoints.len() {
                let first = priority_of(route.waypoints[earlier].delivery_id);
                let second = priority_of(route.waypoints[later].delivery_id);
                prop_assert!(
                    first >= second,
                    "waypoint {} ({first:?}) precedes {} ({second:?})",
                    earlier,
                    later
                );
            }
        }
    }

    /// The allocator never leaves a vehicle with a set that fails the
    /// capacity validator, and the plan partitions the input exactly.
    #[test]
    fn allocation_respects_capacity_and_partitions_input(
        deliveries in deliveries_strategy(24),
        capacities in prop::collection::vec(50.0..400.0f64, 1..4),
    ) {
        let vehicles: Vec<Vehicle> = capacities
            .iter()
            .enumerate()
            .map(|(i, cap)| Vehicle::new(i as u64 + 1, *cap, 100.0))
            .collect();
        let mut next_id = 0u64;
        let plan = FleetAllocator::new()
            .allocate(&deliveries, &vehicles, depot(), OrderingStrategy::Distance, || {
                next_id += 1;
                next_id
            })
            .expect("allocation succeeds");

        for route in &plan.routes {
            let vehicle = vehicles
                .iter()
                .find(|v| v.id == route.vehicle_id)
                .expect("route references a known vehicle");
            let assigned: Vec<Delivery> = route
                .delivery_ids()
                .filter_map(|id| deliveries.iter().find(|d| d.id == id).cloned())
                .collect();
            prop_assert!(fits(&assigned, vehicle));
        }

        let mut covered: Vec<u64> = plan
            .routes
            .iter()
            .flat_map(|r| r.delivery_ids())
            .chain(plan.unassigned.iter().copied())
            .collect();
        covered.sort_unstable();
        let mut expected: Vec<u64> = deliveries.iter().map(|d| d.id).collect();
        expected.sort_unstable();
        prop_assert_eq!(covered, expected);
    }

    /// Haversine distance is symmetric and zero on the diagonal.
    #[test]
    fn haversine_is_a_symmetric_metric(
        lat1 in -89.0..89.0f64,
        lon1 in -179.0..179.0f64,
        lat2 in -89.0..89.0f64,
        lon2 in -179.0..179.0f64,
    ) {
        let a = Coordinate::new(lat1, lon1).expect("in range");
        let b = Coordinate::new(lat2, lon2).expect("in range");
        prop_assert!((haversine_km(&a, &b) - haversine_km(&b, &a)).abs() < 1e-9);
        prop_assert_eq!(haversine_km(&a, &a), 0.0);
    }
}
