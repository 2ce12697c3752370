//! Great-circle distance and the shared travel-time model.
//!
//! Distances use the haversine formula on a spherical Earth. These are pure
//! functions over validated [`Coordinate`] values; a missing coordinate on
//! either end of a leg is charged [`PENALTY_KM`] so greedy search remains
//! total and simply deprioritises unresolvable addresses.

use crate::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance charged for a leg whose endpoint has no usable coordinate.
///
/// Large enough that any real stop wins a nearest-neighbour comparison, yet
/// finite so routes containing bad addresses still terminate.
pub const PENALTY_KM: f64 = 1000.0;

/// Haversine great-circle distance in kilometres.
///
/// Identical coordinates return exactly `0.0`. The result is symmetric in
/// its arguments.
///
/// # Examples
/// ```
/// use lastmile_core::{Coordinate, haversine_km};
///
/// let a = Coordinate::new(0.0, 0.0)?;
/// let b = Coordinate::new(0.0, 1.0)?;
/// // One degree of longitude on the equator is roughly 111.19 km.
/// assert!((haversine_km(&a, &b) - 111.19).abs() < 0.01);
/// assert_eq!(haversine_km(&a, &a), 0.0);
/// # Ok::<(), lastmile_core::CoordinateError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "haversine is floating-point spherical geometry"
)]
#[must_use]
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let central_angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_KM * central_angle
}

/// Distance for one route leg, failing closed on missing coordinates.
#[must_use]
pub fn leg_km(from: Option<&Coordinate>, to: Option<&Coordinate>) -> f64 {
    match (from, to) {
        (Some(start), Some(end)) => haversine_km(start, end),
        _ => PENALTY_KM,
    }
}

/// Travel-time assumptions shared by route construction and evaluation.
///
/// Exposed as configuration so callers can override the defaults rather
/// than relying on constants buried in the algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelModel {
    /// Average road speed in kilometres per hour.
    pub average_speed_kmh: f64,
    /// Fixed service time spent at each stop, in minutes.
    pub service_minutes_per_stop: f64,
}

impl Default for TravelModel {
    fn default() -> Self {
        Self {
            average_speed_kmh: 50.0,
            service_minutes_per_stop: 10.0,
        }
    }
}

impl TravelModel {
    /// Minutes spent driving `km` at the model's average speed.
    #[expect(clippy::float_arithmetic, reason = "time = distance / speed")]
    #[must_use]
    pub fn travel_minutes(&self, km: f64) -> f64 {
        km / self.average_speed_kmh * 60.0
    }

    /// Driving time for `km` plus the fixed per-stop service time.
    #[expect(clippy::float_arithmetic, reason = "sums travel and service time")]
    #[must_use]
    pub fn leg_minutes(&self, km: f64) -> f64 {
        self.travel_minutes(km) + self.service_minutes_per_stop
    }
}
