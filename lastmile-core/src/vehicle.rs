//! Fleet vehicles and their operational status.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identifier for a [`Vehicle`].
pub type VehicleId = u64;

/// Operational state of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleStatus {
    /// Free to take a new route.
    Available,
    /// Bound to an active route.
    Assigned,
    /// In the workshop.
    Maintenance,
    /// Removed from the fleet.
    OutOfService,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Available => "AVAILABLE",
            Self::Assigned => "ASSIGNED",
            Self::Maintenance => "MAINTENANCE",
            Self::OutOfService => "OUT_OF_SERVICE",
        };
        f.write_str(name)
    }
}

impl FromStr for VehicleStatus {
    type Err = UnknownVehicleStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "ASSIGNED" => Ok(Self::Assigned),
            "MAINTENANCE" => Ok(Self::Maintenance),
            "OUT_OF_SERVICE" => Ok(Self::OutOfService),
            other => Err(UnknownVehicleStatus(other.to_owned())),
        }
    }
}

/// The input named no known vehicle status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vehicle status {0:?}")]
pub struct UnknownVehicleStatus(pub String);

/// A delivery vehicle with weight and volume limits.
///
/// A vehicle serves at most one active route at a time; the allocator only
/// considers vehicles whose status is [`VehicleStatus::Available`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// Unique identifier.
    pub id: VehicleId,
    /// Maximum payload weight in kilograms.
    pub capacity_weight_kg: f64,
    /// Maximum payload volume in cubic metres.
    pub capacity_volume_m3: f64,
    /// Operational state.
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Create an available vehicle with the given capacities.
    #[must_use]
    pub const fn new(id: VehicleId, capacity_weight_kg: f64, capacity_volume_m3: f64) -> Self {
        Self {
            id,
            capacity_weight_kg,
            capacity_volume_m3,
            status: VehicleStatus::Available,
        }
    }

    /// Whether the vehicle can be given a new route.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }
}
