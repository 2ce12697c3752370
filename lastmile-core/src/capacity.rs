//! Vehicle capacity validation.
//!
//! A pure weight/volume check used by the fleet allocator while it grows a
//! vehicle's candidate set.

use crate::delivery::Delivery;
use crate::vehicle::Vehicle;

/// Whether `deliveries` fit within `vehicle`'s weight and volume limits.
///
/// Missing weight or volume on a delivery counts as zero rather than a fit
/// failure. The comparison is boundary-inclusive: a load exactly at capacity
/// fits. An empty delivery set does not fit; there is nothing to plan.
///
/// # Examples
/// ```
/// use lastmile_core::{fits, Delivery, Priority, Vehicle};
///
/// let van = Vehicle::new(1, 100.0, 10.0);
/// let parcel = Delivery::new(1, None, Some(100.0), Some(10.0), Priority::Normal);
/// assert!(fits(std::slice::from_ref(&parcel), &van));
///
/// let heavy = Delivery::new(2, None, Some(0.5), None, Priority::Normal);
/// assert!(!fits(&[parcel, heavy], &van));
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "capacity totals are sums of physical quantities"
)]
#[must_use]
pub fn fits(deliveries: &[Delivery], vehicle: &Vehicle) -> bool {
    if deliveries.is_empty() {
        return false;
    }
    let mut total_weight = 0.0_f64;
    let mut total_volume = 0.0_f64;
    for delivery in deliveries {
        total_weight += delivery.weight_kg.unwrap_or(0.0);
        total_volume += delivery.volume_m3.unwrap_or(0.0);
    }
    total_weight <= vehicle.capacity_weight_kg && total_volume <= vehicle.capacity_volume_m3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::Priority;
    use rstest::rstest;

    fn parcel(id: u64, weight: Option<f64>, volume: Option<f64>) -> Delivery {
        Delivery::new(id, None, weight, volume, Priority::Normal)
    }

    #[test]
    fn empty_delivery_set_does_not_fit() {
        assert!(!fits(&[], &Vehicle::new(1, 100.0, 10.0)));
    }

    #[rstest]
    #[case(&[40.0, 40.0], true)]
    #[case(&[40.0, 60.0], true)] // boundary-inclusive
    #[case(&[40.0, 60.0, 0.1], false)]
    fn weight_totals_compare_inclusively(#[case] weights: &[f64], #[case] expected: bool) {
        let deliveries: Vec<Delivery> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| parcel(i as u64, Some(*w), None))
            .collect();
        assert_eq!(fits(&deliveries, &Vehicle::new(1, 100.0, 10.0)), expected);
    }

    #[test]
    fn volume_overflow_alone_rejects_the_set() {
        let deliveries = vec![parcel(1, Some(1.0), Some(6.0)), parcel(2, None, Some(5.0))];
        assert!(!fits(&deliveries, &Vehicle::new(1, 100.0, 10.0)));
    }

    #[test]
    fn missing_weight_and_volume_count_as_zero() {
        let deliveries = vec![parcel(1, None, None), parcel(2, Some(100.0), None)];
        assert!(fits(&deliveries, &Vehicle::new(1, 100.0, 10.0)));
    }
}
