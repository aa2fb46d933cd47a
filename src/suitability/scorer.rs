//! Crop Suitability Scorer
//!
//! Maps a sensor snapshot to a ranked list of candidate crops.
//!
//! Per profile:
//! 1. Score each of the six dimensions with `range_score` (0-100)
//! 2. Weighted sum (moisture 0.20, temperature 0.20, pH/N/P/K 0.15 each)
//! 3. Round half away from zero to an integer in [0, 100]
//!
//! Profiles are then stable-sorted by score (descending) and the top 4 kept.
//!
//! Pure and synchronous: no I/O, no shared mutable state. Safe to call from
//! any number of tasks concurrently.

use super::comparator::range_score;
use super::profile::{CropProfile, Dimension};
use super::snapshot::SensorSnapshot;
use serde::Serialize;

/// Maximum number of recommendations returned
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Per-dimension scores (each 0-100) for one profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScores {
    pub moisture: f64,
    pub temperature: f64,
    pub ph: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Moisture => self.moisture,
            Dimension::Temperature => self.temperature,
            Dimension::Ph => self.ph,
            Dimension::Nitrogen => self.nitrogen,
            Dimension::Phosphorus => self.phosphorus,
            Dimension::Potassium => self.potassium,
        }
    }

    /// Weighted sum before rounding, summed in table order
    pub fn weighted_sum(&self) -> f64 {
        Dimension::ALL
            .iter()
            .fold(0.0, |acc, &d| acc + self.get(d) * d.weight())
    }

    /// Rounded composite suitability score
    pub fn composite(&self) -> u8 {
        self.weighted_sum().round().clamp(0.0, 100.0) as u8
    }
}

/// One ranked crop
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub name: String,
    pub suitability_score: u8,
    pub description: String,
    pub water_requirement: String,
    pub growth_duration: String,
    pub expected_yield: String,

    /// Present only when the caller asked for a per-dimension breakdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<DimensionScores>,
}

impl CropRecommendation {
    fn from_profile(profile: &CropProfile, scores: DimensionScores) -> Self {
        Self {
            name: profile.name.clone(),
            suitability_score: scores.composite(),
            description: profile.description.clone(),
            water_requirement: profile.water_requirement.clone(),
            growth_duration: profile.growth_duration.clone(),
            expected_yield: profile.expected_yield.clone(),
            breakdown: None,
        }
    }

    /// Attach the per-dimension breakdown
    pub fn with_breakdown(mut self, scores: DimensionScores) -> Self {
        self.breakdown = Some(scores);
        self
    }
}

/// Score every dimension of a profile
pub fn dimension_scores(snapshot: &SensorSnapshot, profile: &CropProfile) -> DimensionScores {
    let score = |d: Dimension| range_score(snapshot.value(d), profile.range(d));

    DimensionScores {
        moisture: score(Dimension::Moisture),
        temperature: score(Dimension::Temperature),
        ph: score(Dimension::Ph),
        nitrogen: score(Dimension::Nitrogen),
        phosphorus: score(Dimension::Phosphorus),
        potassium: score(Dimension::Potassium),
    }
}

/// Composite suitability score of one profile
pub fn score_profile(snapshot: &SensorSnapshot, profile: &CropProfile) -> u8 {
    dimension_scores(snapshot, profile).composite()
}

/// Rank every profile (no top-N cut), each paired with its breakdown
///
/// Stable: equal scores keep their table order.
pub fn rank_all(
    snapshot: &SensorSnapshot,
    profiles: &[CropProfile],
) -> Vec<(CropRecommendation, DimensionScores)> {
    let mut ranked: Vec<(CropRecommendation, DimensionScores)> = profiles
        .iter()
        .map(|profile| {
            let scores = dimension_scores(snapshot, profile);
            (CropRecommendation::from_profile(profile, scores), scores)
        })
        .collect();

    ranked.sort_by(|a, b| b.0.suitability_score.cmp(&a.0.suitability_score));
    ranked
}

/// Top recommendations for a snapshot
///
/// Returns `min(4, profiles.len())` entries, highest score first. An empty
/// table yields an empty list.
pub fn score(snapshot: &SensorSnapshot, profiles: &[CropProfile]) -> Vec<CropRecommendation> {
    rank_all(snapshot, profiles)
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(recommendation, _)| recommendation)
        .collect()
}
