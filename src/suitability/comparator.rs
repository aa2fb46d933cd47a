//! Range Comparator
//!
//! Core logic for comparing a reading against a crop's optimal window and
//! turning the distance into a 0-100 dimension score.
//!
//! The penalty is piecewise linear: full credit inside the window, decaying
//! linearly to zero at one half-window-width outside either edge, and
//! clamped at zero beyond that.

use super::profile::OptimalRange;

/// Full credit for a reading inside the optimal window
pub const FULL_SCORE: f64 = 100.0;

/// Where a reading falls relative to the optimal window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFit {
    /// Reading is below the window (value < min)
    BelowRange,

    /// Reading is inside the window (min <= value <= max)
    WithinRange,

    /// Reading is above the window (value > max)
    AboveRange,
}

/// Result of comparing a reading to an optimal window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeComparison {
    pub fit: RangeFit,

    /// Reading being compared
    pub value: f64,

    pub range: OptimalRange,

    /// Distance from the nearest bound (0 if within range)
    pub distance_from_range: f64,

    /// Distance as a fraction of the half-range
    /// 0.0 inside, 1.0 exactly where the score reaches zero
    pub distance_fraction: f64,
}

impl RangeComparison {
    pub fn is_within_range(&self) -> bool {
        self.fit == RangeFit::WithinRange
    }

    /// Dimension score in [0, 100]
    pub fn score(&self) -> f64 {
        if self.is_within_range() {
            FULL_SCORE
        } else {
            (FULL_SCORE - self.distance_fraction * FULL_SCORE).max(0.0)
        }
    }
}

/// Compare a reading against an optimal window
///
/// Expects a well-formed range (`min < max`); see `validation`.
pub fn compare_to_range(value: f64, range: OptimalRange) -> RangeComparison {
    let (fit, distance) = if value < range.min {
        (RangeFit::BelowRange, range.min - value)
    } else if value > range.max {
        (RangeFit::AboveRange, value - range.max)
    } else {
        (RangeFit::WithinRange, 0.0)
    };

    RangeComparison {
        fit,
        value,
        range,
        distance_from_range: distance,
        distance_fraction: distance / range.half_range(),
    }
}

/// Per-dimension score for a reading against `[min, max]`
pub fn range_score(value: f64, range: OptimalRange) -> f64 {
    compare_to_range(value, range).score()
}
