//! Aggregate route metrics.

use thiserror::Error;

use lastmile_core::{leg_km, Coordinate, Delivery, Route, TravelModel, Vehicle};

/// Configuration for [`RouteEvaluator`].
///
/// All constants the metrics depend on live here so callers can override
/// them instead of relying on numbers buried in the computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatorConfig {
    /// Travel-time assumptions for the duration estimate.
    pub travel: TravelModel,
    /// Whether to charge a final leg back to the depot.
    pub include_return_leg: bool,
    /// Distance per stop considered "par" when scoring efficiency; routes
    /// averaging this many kilometres per delivery score 0.5 on the
    /// distance component.
    pub reference_km_per_stop: f64,
    /// Utilisation below which a route is flagged as underusing its
    /// vehicle.
    pub low_utilisation_threshold: f64,
    /// Stop count above which splitting the route is suggested.
    pub max_stops_per_route: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            travel: TravelModel::default(),
            include_return_leg: false,
            reference_km_per_stop: 10.0,
            low_utilisation_threshold: 0.4,
            max_stops_per_route: 30,
        }
    }
}

impl EvaluatorConfig {
    /// Validate the configuration and return it.
    ///
    /// # Errors
    /// Returns [`EvaluatorConfigError`] when a constant is non-positive or
    /// not finite where the formulas require otherwise.
    pub fn validate(self) -> Result<Self, EvaluatorConfigError> {
        if !(self.travel.average_speed_kmh.is_finite() && self.travel.average_speed_kmh > 0.0) {
            return Err(EvaluatorConfigError::NonPositiveSpeed(
                self.travel.average_speed_kmh,
            ));
        }
        if !(self.travel.service_minutes_per_stop.is_finite()
            && self.travel.service_minutes_per_stop >= 0.0)
        {
            return Err(EvaluatorConfigError::NegativeServiceTime(
                self.travel.service_minutes_per_stop,
            ));
        }
        if !(self.reference_km_per_stop.is_finite() && self.reference_km_per_stop > 0.0) {
            return Err(EvaluatorConfigError::NonPositiveReference(
                self.reference_km_per_stop,
            ));
        }
        Ok(self)
    }
}

/// Errors raised when validating an [`EvaluatorConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluatorConfigError {
    /// The average speed must be positive and finite.
    #[error("average speed must be positive, got {0}")]
    NonPositiveSpeed(f64),
    /// The per-stop service time must be non-negative and finite.
    #[error("service minutes per stop must be non-negative, got {0}")]
    NegativeServiceTime(f64),
    /// The efficiency reference distance must be positive and finite.
    #[error("reference km per stop must be positive, got {0}")]
    NonPositiveReference(f64),
}

/// Aggregate measurements for one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMetrics {
    /// Sum of the depot-to-stop and stop-to-stop legs, in kilometres.
    pub total_distance_km: f64,
    /// Driving time plus service time, in minutes.
    pub estimated_duration_minutes: f64,
    /// Normalised efficiency in `[0, 1]`, or `None` when the route has no
    /// stops or the vehicle's capacity is unknown (insufficient data).
    pub efficiency_score: Option<f64>,
}

/// Computes metrics and suggestions for planned routes.
#[derive(Debug, Clone, Default)]
pub struct RouteEvaluator {
    pub(crate) config: EvaluatorConfig,
}

impl RouteEvaluator {
    /// Evaluator with default constants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluator with explicit, validated configuration.
    ///
    /// # Errors
    /// Returns [`EvaluatorConfigError`] when the configuration is invalid.
    pub fn with_config(config: EvaluatorConfig) -> Result<Self, EvaluatorConfigError> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    /// Compute metrics for `route`.
    ///
    /// Distances are recomputed from the deliveries' coordinates rather
    /// than trusted from the stored route, so stale totals cannot leak
    /// through. A waypoint whose delivery is absent from `deliveries` (or
    /// has no destination) is charged the penalty distance.
    #[expect(
        clippy::float_arithmetic,
        reason = "metrics are sums and ratios of physical quantities"
    )]
    #[must_use]
    pub fn metrics(
        &self,
        route: &Route,
        vehicle: Option<&Vehicle>,
        deliveries: &[Delivery],
    ) -> RouteMetrics {
        let stops = route.stop_count();
        let legs = self.leg_distances(route, deliveries);
        let total_distance_km: f64 = legs.iter().sum();
        let estimated_duration_minutes = self.config.travel.travel_minutes(total_distance_km)
            + self.config.travel.service_minutes_per_stop * stops_as_f64(stops);

        RouteMetrics {
            total_distance_km,
            estimated_duration_minutes,
            efficiency_score: self.efficiency(total_distance_km, stops, vehicle, deliveries),
        }
    }

    /// Leg distances depot -> stop 1 -> … -> stop N (plus the return leg
    /// when configured), recomputed from coordinates.
    pub(crate) fn leg_distances(&self, route: &Route, deliveries: &[Delivery]) -> Vec<f64> {
        let stops = stop_coordinates(route, deliveries);
        let mut legs = Vec::with_capacity(stops.len() + 1);
        let mut previous = Some(route.depot);
        for destination in &stops {
            legs.push(leg_km(previous.as_ref(), destination.as_ref()));
            previous = *destination;
        }
        if self.config.include_return_leg && !stops.is_empty() {
            legs.push(leg_km(previous.as_ref(), Some(&route.depot)));
        }
        legs
    }

    /// Efficiency in `[0, 1]`: the mean of a distance-per-stop term that
    /// decays towards zero as routes get longer per delivery, and the
    /// vehicle's capacity utilisation. `None` without stops or capacity
    /// data.
    #[expect(
        clippy::float_arithmetic,
        reason = "the score is a blend of two normalised ratios"
    )]
    fn efficiency(
        &self,
        total_distance_km: f64,
        stops: usize,
        vehicle: Option<&Vehicle>,
        deliveries: &[Delivery],
    ) -> Option<f64> {
        if stops == 0 {
            return None;
        }
        let utilisation = vehicle.and_then(|v| capacity_utilisation(v, deliveries))?;
        let km_per_stop = total_distance_km / stops_as_f64(stops);
        let reference = self.config.reference_km_per_stop;
        let distance_term = reference / (reference + km_per_stop);
        Some(((distance_term + utilisation) / 2.0).clamp(0.0, 1.0))
    }
}

/// Fraction of the vehicle's capacity the assigned deliveries consume,
/// averaged over the weight and volume axes that have positive capacity.
#[expect(
    clippy::float_arithmetic,
    reason = "utilisation is a ratio of load to capacity"
)]
pub(crate) fn capacity_utilisation(vehicle: &Vehicle, deliveries: &[Delivery]) -> Option<f64> {
    let total_weight: f64 = deliveries.iter().filter_map(|d| d.weight_kg).sum();
    let total_volume: f64 = deliveries.iter().filter_map(|d| d.volume_m3).sum();

    let mut axes = 0.0_f64;
    let mut sum = 0.0_f64;
    if vehicle.capacity_weight_kg > 0.0 {
        axes += 1.0;
        sum += (total_weight / vehicle.capacity_weight_kg).min(1.0);
    }
    if vehicle.capacity_volume_m3 > 0.0 {
        axes += 1.0;
        sum += (total_volume / vehicle.capacity_volume_m3).min(1.0);
    }
    if axes == 0.0 {
        return None;
    }
    Some(sum / axes)
}

/// Destination of each waypoint's delivery, in visiting order.
pub(crate) fn stop_coordinates(route: &Route, deliveries: &[Delivery]) -> Vec<Option<Coordinate>> {
    route
        .waypoints
        .iter()
        .map(|waypoint| {
            deliveries
                .iter()
                .find(|d| d.id == waypoint.delivery_id)
                .and_then(|d| d.destination)
        })
        .collect()
}

#[expect(
    clippy::cast_precision_loss,
    reason = "stop counts are far below the f64 mantissa"
)]
pub(crate) fn stops_as_f64(stops: usize) -> f64 {
    stops as f64
}
