//! Crop Profile definitions
//!
//! A profile describes one crop's optimal growing window across the six
//! telemetry dimensions, plus descriptive metadata that is carried through
//! to recommendations untouched.

use serde::{Deserialize, Serialize};

/// The six sensor dimensions a crop profile constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Moisture,
    Temperature,
    Ph,
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Dimension {
    /// All dimensions in table order
    pub const ALL: [Dimension; 6] = [
        Dimension::Moisture,
        Dimension::Temperature,
        Dimension::Ph,
        Dimension::Nitrogen,
        Dimension::Phosphorus,
        Dimension::Potassium,
    ];

    /// Composite weight of this dimension (weights sum to 1.0)
    pub fn weight(&self) -> f64 {
        match self {
            Dimension::Moisture => 0.20,
            Dimension::Temperature => 0.20,
            Dimension::Ph => 0.15,
            Dimension::Nitrogen => 0.15,
            Dimension::Phosphorus => 0.15,
            Dimension::Potassium => 0.15,
        }
    }

    /// Field name of the matching range on the wire (e.g. "phRange")
    pub fn range_field(&self) -> &'static str {
        match self {
            Dimension::Moisture => "moistureRange",
            Dimension::Temperature => "temperatureRange",
            Dimension::Ph => "phRange",
            Dimension::Nitrogen => "nitrogenRange",
            Dimension::Phosphorus => "phosphorusRange",
            Dimension::Potassium => "potassiumRange",
        }
    }
}

/// Inclusive optimal window `[min, max]`
///
/// Serialized as a two-element array to match the profile table format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

impl OptimalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Half the window width; the decay distance for out-of-range penalties
    pub fn half_range(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Well-formed means finite bounds with `min < max`
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

impl From<[f64; 2]> for OptimalRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<OptimalRange> for [f64; 2] {
    fn from(range: OptimalRange) -> Self {
        [range.min, range.max]
    }
}

/// Static reference record for one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropProfile {
    pub name: String,

    // ========================================================================
    // Optimal ranges
    // ========================================================================
    /// Soil moisture (%)
    pub moisture_range: OptimalRange,
    /// Soil temperature (°C)
    pub temperature_range: OptimalRange,
    /// Soil pH
    pub ph_range: OptimalRange,
    /// Nitrogen (mg/kg)
    pub nitrogen_range: OptimalRange,
    /// Phosphorus (mg/kg)
    pub phosphorus_range: OptimalRange,
    /// Potassium (mg/kg)
    pub potassium_range: OptimalRange,

    // ========================================================================
    // Descriptive metadata (opaque, copied into recommendations)
    // ========================================================================
    pub water_requirement: String,
    pub growth_duration: String,
    pub expected_yield: String,
    pub description: String,
}

impl CropProfile {
    /// Optimal range for a given dimension
    pub fn range(&self, dimension: Dimension) -> OptimalRange {
        match dimension {
            Dimension::Moisture => self.moisture_range,
            Dimension::Temperature => self.temperature_range,
            Dimension::Ph => self.ph_range,
            Dimension::Nitrogen => self.nitrogen_range,
            Dimension::Phosphorus => self.phosphorus_range,
            Dimension::Potassium => self.potassium_range,
        }
    }
}
