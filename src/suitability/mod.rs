//! Crop Suitability Engine
//!
//! Scores current soil telemetry against each crop's optimal growing window
//! and ranks the crops.
//!
//! ## Architecture
//! - `profile.rs` - CropProfile, OptimalRange and the six scoring dimensions
//! - `snapshot.rs` - SensorSnapshot + its unvalidated wire payload
//! - `validation.rs` - InvalidInputError and pre-scoring checks
//! - `comparator.rs` - Per-dimension range comparison and decay score
//! - `scorer.rs` - Weighted composite, ranking, top-4 recommendations

pub mod profile;
pub mod snapshot;
pub mod validation;
pub mod comparator;
pub mod scorer;

// Re-export public API
pub use profile::{CropProfile, Dimension, OptimalRange};
pub use snapshot::{SensorSnapshot, SnapshotPayload};
pub use validation::{validate_profiles, InvalidInputError};
pub use comparator::{compare_to_range, range_score, RangeComparison, RangeFit};
pub use scorer::{
    dimension_scores, rank_all, score, score_profile, CropRecommendation, DimensionScores,
    MAX_RECOMMENDATIONS,
};
