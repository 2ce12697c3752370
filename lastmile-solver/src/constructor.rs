//! Single-vehicle route construction.
//!
//! The core loop is the classic nearest-neighbour heuristic: starting at
//! the depot, repeatedly visit the cheapest unvisited stop. O(n²) in the
//! number of deliveries, which stays small per vehicle (tens, not
//! thousands). Greedy, so no claim of global optimality.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use lastmile_core::{
    leg_km, Coordinate, Delivery, Priority, Route, RouteError, RouteId, TravelModel, Vehicle,
    Waypoint,
};

/// How the constructor orders stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Nearest unvisited stop by great-circle distance.
    Distance,
    /// Strict priority buckets, nearest-neighbour within each bucket.
    Priority,
    /// Nearest unvisited stop by estimated travel time.
    Time,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Distance => "distance",
            Self::Priority => "priority",
            Self::Time => "time",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distance" => Ok(Self::Distance),
            "priority" => Ok(Self::Priority),
            "time" => Ok(Self::Time),
            other => Err(UnknownStrategy(other.to_owned())),
        }
    }
}

/// The input named no known construction strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy {0:?}; expected distance, priority or time")]
pub struct UnknownStrategy(pub String);

/// Configuration for [`RouteConstructor`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConstructorConfig {
    /// Travel-time assumptions used for arrival estimates and the time
    /// strategy's edge costs.
    pub travel: TravelModel,
}

/// Builds one vehicle's visiting order.
#[derive(Debug, Clone, Default)]
pub struct RouteConstructor {
    config: ConstructorConfig,
}

/// Priority buckets in strict descending urgency. A higher-priority
/// delivery is always visited before any lower-priority one.
const PRIORITY_BUCKETS: [Priority; 5] = [
    Priority::Critical,
    Priority::Urgent,
    Priority::High,
    Priority::Normal,
    Priority::Low,
];

impl RouteConstructor {
    /// Construct with default travel assumptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct with explicit configuration.
    #[must_use]
    pub const fn with_config(config: ConstructorConfig) -> Self {
        Self { config }
    }

    /// Build a planned route visiting every input delivery exactly once.
    ///
    /// An empty delivery slice yields an empty route. Deliveries without a
    /// resolvable destination are still included, with each of their legs
    /// costed at [`lastmile_core::PENALTY_KM`], so nothing is silently
    /// dropped.
    ///
    /// # Errors
    /// Returns [`RouteError`] if the assembled waypoint sequence violates
    /// the route invariants (duplicate delivery ids in the input).
    pub fn construct(
        &self,
        route_id: RouteId,
        deliveries: &[Delivery],
        vehicle: &Vehicle,
        depot: Coordinate,
        strategy: Strategy,
    ) -> Result<Route, RouteError> {
        if deliveries.is_empty() {
            return Ok(Route::empty(route_id, vehicle.id, depot));
        }

        let order = match strategy {
            Strategy::Distance => self.nearest_neighbour(deliveries, Some(depot), Cost::Distance),
            Strategy::Time => self.nearest_neighbour(deliveries, Some(depot), Cost::TravelTime),
            Strategy::Priority => self.priority_buckets(deliveries, depot),
        };
        self.assemble(route_id, vehicle, depot, &order)
    }

    /// Greedy nearest-neighbour ordering over one pool of deliveries.
    ///
    /// Ties break towards the earliest input position, which keeps the
    /// result stable and deterministic.
    fn nearest_neighbour<'d>(
        &self,
        pool: &'d [Delivery],
        start: Option<Coordinate>,
        cost: Cost,
    ) -> Vec<&'d Delivery> {
        let mut unvisited: Vec<&Delivery> = pool.iter().collect();
        let mut ordered = Vec::with_capacity(pool.len());
        let mut current = start;

        while !unvisited.is_empty() {
            let mut best = 0;
            let mut best_cost = f64::INFINITY;
            for (index, candidate) in unvisited.iter().enumerate() {
                let edge = self.edge_cost(current.as_ref(), candidate, cost);
                if edge < best_cost {
                    best_cost = edge;
                    best = index;
                }
            }
            let chosen = unvisited.remove(best);
            if chosen.destination.is_none() {
                log::warn!(
                    "delivery {} has no resolvable destination; routed at penalty distance",
                    chosen.id
                );
            }
            current = chosen.destination;
            ordered.push(chosen);
        }
        ordered
    }

    /// Priority ordering: run nearest-neighbour inside each descending
    /// bucket, chaining the end of one bucket into the start of the next.
    fn priority_buckets<'d>(&self, pool: &'d [Delivery], depot: Coordinate) -> Vec<&'d Delivery> {
        let mut ordered: Vec<&Delivery> = Vec::with_capacity(pool.len());
        let mut current = Some(depot);
        for level in PRIORITY_BUCKETS {
            let bucket: Vec<Delivery> = pool
                .iter()
                .filter(|d| d.priority == level)
                .cloned()
                .collect();
            if bucket.is_empty() {
                continue;
            }
            let bucket_order = self.nearest_neighbour(&bucket, current, Cost::Distance);
            current = bucket_order.last().and_then(|d| d.destination);
            // Map back to the caller's slice so lifetimes line up.
            for chosen in bucket_order {
                if let Some(original) = pool.iter().find(|d| d.id == chosen.id) {
                    ordered.push(original);
                }
            }
        }
        ordered
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "edge costs are distances or travel minutes"
    )]
    fn edge_cost(&self, from: Option<&Coordinate>, to: &Delivery, cost: Cost) -> f64 {
        let km = leg_km(from, to.destination.as_ref());
        match cost {
            Cost::Distance => km,
            Cost::TravelTime => self.config.travel.leg_minutes(km),
        }
    }

    /// Turn an ordering into waypoints with leg distances and cumulative
    /// arrival estimates, then validate the route invariants.
    #[expect(
        clippy::float_arithmetic,
        reason = "accumulates leg distances and arrival minutes"
    )]
    fn assemble(
        &self,
        route_id: RouteId,
        vehicle: &Vehicle,
        depot: Coordinate,
        order: &[&Delivery],
    ) -> Result<Route, RouteError> {
        let travel = self.config.travel;
        let mut waypoints = Vec::with_capacity(order.len());
        let mut previous = Some(depot);
        let mut total_km = 0.0_f64;
        let mut elapsed_minutes = 0.0_f64;
        let mut sequence_index: u32 = 0;

        for delivery in order {
            sequence_index = sequence_index.saturating_add(1);
            let km = leg_km(previous.as_ref(), delivery.destination.as_ref());
            total_km += km;
            elapsed_minutes += travel.travel_minutes(km);
            waypoints.push(Waypoint {
                sequence_index,
                delivery_id: delivery.id,
                distance_from_previous_km: km,
                estimated_arrival_minutes: elapsed_minutes,
            });
            elapsed_minutes += travel.service_minutes_per_stop;
            previous = delivery.destination;
        }

        Route::new(
            route_id,
            vehicle.id,
            depot,
            waypoints,
            total_km,
            elapsed_minutes,
        )
    }
}

/// Edge-cost interpretation for the greedy loop.
///
/// With a constant average speed the travel-time cost is a monotone
/// function of distance, so the two rankings usually coincide; the time
/// cost exists so a future non-uniform model slots in without touching the
/// search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cost {
    Distance,
    TravelTime,
}
