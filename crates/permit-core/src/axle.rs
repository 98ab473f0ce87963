//! # Axle Configuration
//!
//! One [`AxleConfiguration`] entry describes one axle unit of a vehicle
//! combination, not one vehicle: the power unit contributes two entries
//! (steer and drive) and every other vehicle that is not ignored for axle
//! calculation contributes one. A combination of `n` such vehicles
//! therefore has `n + 1` axle units.

use serde::{Deserialize, Serialize};

/// A single axle unit at a fixed point in the combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxleConfiguration {
    /// Number of axles in this unit.
    pub number_of_axles: u32,
    /// Distance between the first and last axle of this unit. Only
    /// meaningful when `number_of_axles > 1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    /// Longitudinal distance to the next axle unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_to_next: Option<f64>,
    /// Weight carried by this unit.
    pub weight: f64,
    /// Number of tires on this unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_tires: Option<u32>,
    /// Tire width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tire_size: Option<f64>,
}

impl AxleConfiguration {
    /// An axle unit with the given axle count and weight.
    pub fn new(number_of_axles: u32, weight: f64) -> Self {
        Self {
            number_of_axles,
            weight,
            ..Self::default()
        }
    }

    /// Set the spread of this unit.
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = Some(spread);
        self
    }

    /// Set the spacing to the next unit.
    pub fn with_spacing_to_next(mut self, spacing: f64) -> Self {
        self.spacing_to_next = Some(spacing);
        self
    }

    /// Effective spread: zero for single-axle units or when absent.
    pub fn effective_spread(&self) -> f64 {
        if self.number_of_axles > 1 {
            self.spread.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}
