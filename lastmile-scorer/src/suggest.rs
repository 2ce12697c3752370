//! Rule-based improvement suggestions.
//!
//! Advisory only: suggestions never mutate the route. Each rule is a
//! deterministic function of the route, its deliveries and the vehicle.

use std::fmt;

use lastmile_core::{Coordinate, Delivery, DeliveryId, Route, Vehicle};

use crate::metrics::{capacity_utilisation, stop_coordinates, RouteEvaluator};

/// One piece of advice about a planned route.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    /// The vehicle is mostly empty; a smaller vehicle or more deliveries
    /// would use it better.
    UnderutilisedCapacity {
        /// Fraction of capacity in use, in `[0, 1]`.
        utilisation: f64,
    },
    /// Swapping two adjacent stops would shorten the route.
    ReorderAdjacentStops {
        /// The earlier of the two stops.
        first: DeliveryId,
        /// The later of the two stops.
        second: DeliveryId,
        /// Distance saved by the swap, in kilometres.
        saving_km: f64,
    },
    /// Some stops have no resolvable coordinates and are costed at the
    /// penalty distance.
    UnresolvableAddresses {
        /// Number of affected stops.
        count: usize,
    },
    /// The route has more stops than one vehicle comfortably serves.
    ConsiderSplittingRoute {
        /// Current stop count.
        stops: usize,
    },
}

impl fmt::Display for Suggestion {
    #[expect(
        clippy::float_arithmetic,
        reason = "renders the utilisation ratio as a percentage"
    )]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnderutilisedCapacity { utilisation } => write!(
                f,
                "vehicle capacity underutilised ({:.0}% in use); consider a smaller vehicle or adding deliveries",
                utilisation * 100.0
            ),
            Self::ReorderAdjacentStops {
                first,
                second,
                saving_km,
            } => write!(
                f,
                "swapping stops for deliveries {first} and {second} would shorten the route by {saving_km:.1} km"
            ),
            Self::UnresolvableAddresses { count } => write!(
                f,
                "{count} stop(s) have unresolvable addresses and are costed at the penalty distance"
            ),
            Self::ConsiderSplittingRoute { stops } => write!(
                f,
                "route has {stops} stops; consider splitting it across additional vehicles"
            ),
        }
    }
}

impl RouteEvaluator {
    /// Produce advisory suggestions for `route`.
    ///
    /// The rules, in emission order: capacity underutilisation, the best
    /// single adjacent-stop swap that shortens the route, unresolvable
    /// addresses, and oversized stop counts. An empty list means no rule
    /// fired.
    #[must_use]
    pub fn suggest(
        &self,
        route: &Route,
        vehicle: Option<&Vehicle>,
        deliveries: &[Delivery],
    ) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();
        if route.stop_count() == 0 {
            return suggestions;
        }

        if let Some(utilisation) = vehicle.and_then(|v| capacity_utilisation(v, deliveries)) {
            if utilisation < self.config.low_utilisation_threshold {
                suggestions.push(Suggestion::UnderutilisedCapacity { utilisation });
            }
        }

        if let Some(swap) = self.best_adjacent_swap(route, deliveries) {
            suggestions.push(swap);
        }

        let unresolvable = stop_coordinates(route, deliveries)
            .iter()
            .filter(|c| c.is_none())
            .count();
        if unresolvable > 0 {
            suggestions.push(Suggestion::UnresolvableAddresses {
                count: unresolvable,
            });
        }

        if route.stop_count() > self.config.max_stops_per_route {
            suggestions.push(Suggestion::ConsiderSplittingRoute {
                stops: route.stop_count(),
            });
        }
        suggestions
    }

    /// The adjacent swap with the largest distance saving, if any saves
    /// more than a rounding error.
    #[expect(
        clippy::float_arithmetic,
        reason = "compares leg sums before and after a swap"
    )]
    fn best_adjacent_swap(&self, route: &Route, deliveries: &[Delivery]) -> Option<Suggestion> {
        const MIN_SAVING_KM: f64 = 0.01;

        let stops = stop_coordinates(route, deliveries);
        let mut best: Option<(usize, f64)> = None;

        for index in 0..stops.len().saturating_sub(1) {
            let previous = if index == 0 {
                Some(route.depot)
            } else {
                stops.get(index - 1).copied().flatten()
            };
            let a = stops.get(index).copied().flatten();
            let b = stops.get(index + 1).copied().flatten();
            let next = stops.get(index + 2).copied().flatten();

            let current = chain_km(previous, a, b, next);
            let swapped = chain_km(previous, b, a, next);
            let saving = current - swapped;
            if saving > MIN_SAVING_KM && best.is_none_or(|(_, s)| saving > s) {
                best = Some((index, saving));
            }
        }

        best.and_then(|(index, saving_km)| {
            let first = route.waypoints.get(index)?.delivery_id;
            let second = route.waypoints.get(index + 1)?.delivery_id;
            Some(Suggestion::ReorderAdjacentStops {
                first,
                second,
                saving_km,
            })
        })
    }
}

/// Distance along `previous -> a -> b -> next`, skipping the final leg
/// when there is no following stop.
#[expect(
    clippy::float_arithmetic,
    reason = "sums the legs around a candidate swap"
)]
fn chain_km(
    previous: Option<Coordinate>,
    a: Option<Coordinate>,
    b: Option<Coordinate>,
    next: Option<Coordinate>,
) -> f64 {
    let mut total = pair_km(previous, a) + pair_km(a, b);
    if next.is_some() {
        total += pair_km(b, next);
    }
    total
}

fn pair_km(from: Option<Coordinate>, to: Option<Coordinate>) -> f64 {
    lastmile_core::leg_km(from.as_ref(), to.as_ref())
}
