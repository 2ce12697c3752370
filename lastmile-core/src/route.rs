//! Routes and their ordered waypoint sequences.
//!
//! A route exclusively owns its waypoints; deliveries are referenced by id
//! only, so no back-pointers exist from a delivery to its route. Cancelling
//! a route releases its deliveries back to the unassigned pool.

use std::fmt;

use thiserror::Error;

use crate::delivery::DeliveryId;
use crate::vehicle::VehicleId;
use crate::Coordinate;

/// Identifier for a [`Route`].
pub type RouteId = u64;

/// One stop in a route's visiting order.
///
/// Sequence indexes are 1-based; the depot is implicitly index 0. Arrival
/// estimates are minutes from route start, keeping the core clock-free.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// Position in the visiting order, starting at 1.
    pub sequence_index: u32,
    /// The delivery served at this stop.
    pub delivery_id: DeliveryId,
    /// Distance travelled from the previous stop (or depot) in kilometres.
    pub distance_from_previous_km: f64,
    /// Estimated arrival, in minutes after route start.
    pub estimated_arrival_minutes: f64,
}

/// Lifecycle state of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteStatus {
    /// Computed but not yet started.
    Planned,
    /// The vehicle has departed.
    InProgress,
    /// All stops visited. Terminal.
    Completed,
    /// Abandoned; deliveries are released. Terminal.
    Cancelled,
}

impl RouteStatus {
    /// Whether the state machine permits moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Planned, Self::InProgress | Self::Cancelled)
                | (Self::InProgress, Self::Completed | Self::Cancelled)
        )
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Planned => "PLANNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// Errors raised when assembling or mutating a [`Route`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Waypoint sequence indexes were not contiguous from 1.
    #[error("waypoint at position {position} has sequence index {found}, expected {expected}")]
    NonContiguousSequence {
        /// Zero-based position in the supplied waypoint list.
        position: usize,
        /// Sequence index found there.
        found: u32,
        /// Sequence index required by the invariant.
        expected: u32,
    },
    /// The same delivery appeared in more than one waypoint.
    #[error("delivery {0} appears more than once in the route")]
    DuplicateDelivery(DeliveryId),
    /// A status change violated the route state machine.
    #[error("invalid route status transition {from} -> {to}")]
    InvalidTransition {
        /// Status the route was in.
        from: RouteStatus,
        /// Status the caller attempted to move to.
        to: RouteStatus,
    },
}

/// A planned visiting order for one vehicle out of a single depot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Unique identifier.
    pub id: RouteId,
    /// The vehicle driving this route.
    pub vehicle_id: VehicleId,
    /// Common start location for the run.
    pub depot: Coordinate,
    /// Stops in visiting order.
    pub waypoints: Vec<Waypoint>,
    /// Sum of all leg distances in kilometres.
    pub total_distance_km: f64,
    /// Estimated time to complete the route, in minutes.
    pub estimated_duration_minutes: f64,
    /// Lifecycle state.
    pub status: RouteStatus,
}

impl Route {
    /// Assemble a planned route, checking the waypoint invariants.
    ///
    /// # Errors
    /// Returns [`RouteError::NonContiguousSequence`] when indexes do not run
    /// 1, 2, … in order, or [`RouteError::DuplicateDelivery`] when a
    /// delivery appears twice.
    pub fn new(
        id: RouteId,
        vehicle_id: VehicleId,
        depot: Coordinate,
        waypoints: Vec<Waypoint>,
        total_distance_km: f64,
        estimated_duration_minutes: f64,
    ) -> Result<Self, RouteError> {
        let mut seen = std::collections::HashSet::with_capacity(waypoints.len());
        let mut expected: u32 = 1;
        for (position, waypoint) in waypoints.iter().enumerate() {
            if waypoint.sequence_index != expected {
                return Err(RouteError::NonContiguousSequence {
                    position,
                    found: waypoint.sequence_index,
                    expected,
                });
            }
            if !seen.insert(waypoint.delivery_id) {
                return Err(RouteError::DuplicateDelivery(waypoint.delivery_id));
            }
            expected = expected.saturating_add(1);
        }
        Ok(Self {
            id,
            vehicle_id,
            depot,
            waypoints,
            total_distance_km,
            estimated_duration_minutes,
            status: RouteStatus::Planned,
        })
    }

    /// A planned route with no stops.
    #[must_use]
    pub const fn empty(id: RouteId, vehicle_id: VehicleId, depot: Coordinate) -> Self {
        Self {
            id,
            vehicle_id,
            depot,
            waypoints: Vec::new(),
            total_distance_km: 0.0,
            estimated_duration_minutes: 0.0,
            status: RouteStatus::Planned,
        }
    }

    /// Number of stops on the route.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Ids of the deliveries served, in visiting order.
    pub fn delivery_ids(&self) -> impl Iterator<Item = DeliveryId> + '_ {
        self.waypoints.iter().map(|w| w.delivery_id)
    }

    /// Move the route to `next`, enforcing the transition table.
    ///
    /// # Errors
    /// Returns [`RouteError::InvalidTransition`] when the change is not
    /// permitted; the route is left untouched.
    pub fn advance_to(&mut self, next: RouteStatus) -> Result<(), RouteError> {
        if !self.status.can_transition_to(next) {
            return Err(RouteError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn depot() -> Coordinate {
        Coordinate::new(0.0, 0.0).expect("depot")
    }

    fn waypoint(sequence_index: u32, delivery_id: DeliveryId) -> Waypoint {
        Waypoint {
            sequence_index,
            delivery_id,
            distance_from_previous_km: 1.0,
            estimated_arrival_minutes: 10.0,
        }
    }

    #[test]
    fn accepts_contiguous_waypoints() {
        let route = Route::new(
            1,
            1,
            depot(),
            vec![waypoint(1, 10), waypoint(2, 11), waypoint(3, 12)],
            3.0,
            33.0,
        )
        .expect("valid sequence");
        assert_eq!(route.stop_count(), 3);
        assert_eq!(route.delivery_ids().collect::<Vec<_>>(), vec![10, 11, 12]);
        assert_eq!(route.status, RouteStatus::Planned);
    }

    #[rstest]
    #[case(vec![waypoint(0, 10)])]
    #[case(vec![waypoint(1, 10), waypoint(3, 11)])]
    #[case(vec![waypoint(2, 10), waypoint(1, 11)])]
    fn rejects_non_contiguous_sequences(#[case] waypoints: Vec<Waypoint>) {
        assert!(matches!(
            Route::new(1, 1, depot(), waypoints, 0.0, 0.0),
            Err(RouteError::NonContiguousSequence { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_deliveries() {
        let result = Route::new(
            1,
            1,
            depot(),
            vec![waypoint(1, 10), waypoint(2, 10)],
            2.0,
            20.0,
        );
        assert_eq!(result, Err(RouteError::DuplicateDelivery(10)));
    }

    #[test]
    fn planned_routes_may_start_and_complete() {
        let mut route = Route::empty(1, 1, depot());
        route.advance_to(RouteStatus::InProgress).expect("start");
        route.advance_to(RouteStatus::Completed).expect("finish");
        let err = route
            .advance_to(RouteStatus::InProgress)
            .expect_err("completed is terminal");
        assert!(matches!(err, RouteError::InvalidTransition { .. }));
    }
}
