//! Unit Conversion - Linear Lengths
//!
//! Everything downstream of the converter works in meters.

use serde::{Deserialize, Serialize};

pub const FEET_TO_METERS: f64 = 0.3048;
pub const MM_TO_METERS: f64 = 0.001;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Meters,
    Feet,
    #[serde(alias = "mm")]
    Millimeters,
}

impl LengthUnit {
    /// Multiplier taking a value in this unit to meters
    pub fn factor(self) -> f64 {
        match self {
            LengthUnit::Meters => 1.0,
            LengthUnit::Feet => FEET_TO_METERS,
            LengthUnit::Millimeters => MM_TO_METERS,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Meters => "m",
            LengthUnit::Feet => "ft",
            LengthUnit::Millimeters => "mm",
        }
    }
}

/// Convert a length to meters. NaN and infinities pass through unchanged.
pub fn to_meters(value: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Meters => value,
        other => value * other.factor(),
    }
}

/// Inverse of [`to_meters`], for showing computed spacings in the caller's unit
pub fn from_meters(value: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Meters => value,
        other => value / other.factor(),
    }
}
