//! Raw and rounded coordinate types.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::LocationError;

/// Raw position reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
}

impl Coordinates {
    /// Pair a latitude with a longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Round both components to whole degrees.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidCoordinates`] when either component is
    /// NaN or infinite.
    pub fn rounded(&self) -> Result<RoundedPosition, LocationError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(LocationError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        Ok(RoundedPosition {
            latitude: round_half_up(self.latitude),
            longitude: round_half_up(self.longitude),
        })
    }
}

/// Whole-degree position used for change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundedPosition {
    /// Rounded latitude.
    pub latitude: i64,
    /// Rounded longitude.
    pub longitude: i64,
}

impl Display for RoundedPosition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.latitude, self.longitude)
    }
}

/// Round to the nearest integer with halves going toward positive infinity.
///
/// `2.5` becomes `3` and `-2.5` becomes `-2`. Values outside the `i64` range
/// saturate.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    };
    rounded as i64
}
