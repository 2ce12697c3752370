//! Validated geographic coordinates.
//!
//! Wraps [`geo::Coord`] so latitude and longitude are range-checked at
//! construction. Downstream distance code can then assume well-formed
//! values; absent coordinates are modelled as `Option<Coordinate>` and fail
//! closed in [`crate::distance`].

use geo::Coord;
use thiserror::Error;

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was not finite or outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude was not finite or outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated point on the globe in decimal degrees.
///
/// # Examples
/// ```
/// use lastmile_core::Coordinate;
///
/// let depot = Coordinate::new(6.9271, 79.8612)?;
/// assert_eq!(depot.latitude(), 6.9271);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok::<(), lastmile_core::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawCoordinate", into = "RawCoordinate")
)]
pub struct Coordinate {
    inner: Coord<f64>,
}

impl Coordinate {
    /// Validate and construct a coordinate from decimal degrees.
    ///
    /// # Errors
    /// Returns [`CoordinateError`] when either component is out of range or
    /// not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            inner: Coord {
                x: longitude,
                y: latitude,
            },
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.inner.y
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.inner.x
    }

    /// The underlying `geo` coordinate (`x` = longitude, `y` = latitude).
    #[must_use]
    pub const fn as_coord(&self) -> Coord<f64> {
        self.inner
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

#[cfg(feature = "serde")]
impl From<Coordinate> for RawCoordinate {
    fn from(value: Coordinate) -> Self {
        Self {
            latitude: value.latitude(),
            longitude: value.longitude(),
        }
    }
}
