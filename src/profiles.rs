//! Crop Profile Table
//!
//! The built-in reference table of supported crops, plus loading of a
//! replacement table from a JSON file. Whichever table is active is built
//! once at startup and shared read-only afterwards.

use crate::suitability::{validate_profiles, CropProfile, OptimalRange};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

static DEFAULT_PROFILES: OnceLock<Vec<CropProfile>> = OnceLock::new();

/// Built-in table of 8 crops, in ranking tie-break order
pub fn default_profiles() -> &'static [CropProfile] {
    DEFAULT_PROFILES.get_or_init(build_default_profiles)
}

#[allow(clippy::too_many_arguments)]
fn crop(
    name: &str,
    moisture: [f64; 2],
    temperature: [f64; 2],
    ph: [f64; 2],
    nitrogen: [f64; 2],
    phosphorus: [f64; 2],
    potassium: [f64; 2],
    water_requirement: &str,
    growth_duration: &str,
    expected_yield: &str,
    description: &str,
) -> CropProfile {
    CropProfile {
        name: name.to_string(),
        moisture_range: OptimalRange::from(moisture),
        temperature_range: OptimalRange::from(temperature),
        ph_range: OptimalRange::from(ph),
        nitrogen_range: OptimalRange::from(nitrogen),
        phosphorus_range: OptimalRange::from(phosphorus),
        potassium_range: OptimalRange::from(potassium),
        water_requirement: water_requirement.to_string(),
        growth_duration: growth_duration.to_string(),
        expected_yield: expected_yield.to_string(),
        description: description.to_string(),
    }
}

fn build_default_profiles() -> Vec<CropProfile> {
    vec![
        crop(
            "Rice",
            [60.0, 90.0], [20.0, 35.0], [5.5, 6.5], [120.0, 300.0], [20.0, 40.0], [150.0, 300.0],
            "High", "90-120 days", "4-6 tons/hectare",
            "A staple food crop that thrives in wet conditions with good nitrogen levels.",
        ),
        crop(
            "Wheat",
            [45.0, 65.0], [15.0, 25.0], [6.0, 7.5], [100.0, 250.0], [15.0, 35.0], [100.0, 250.0],
            "Medium", "100-130 days", "3-5 tons/hectare",
            "A cool-season crop that performs well in well-drained soils with moderate fertility.",
        ),
        crop(
            "Maize (Corn)",
            [50.0, 75.0], [18.0, 32.0], [5.8, 7.0], [150.0, 300.0], [20.0, 40.0], [150.0, 300.0],
            "Medium-High", "80-110 days", "5-8 tons/hectare",
            "A versatile crop that requires good nitrogen levels and moderate water.",
        ),
        crop(
            "Soybean",
            [50.0, 70.0], [20.0, 30.0], [6.0, 7.0], [50.0, 200.0], [20.0, 40.0], [150.0, 300.0],
            "Medium", "90-120 days", "2-4 tons/hectare",
            "A legume that can fix nitrogen and performs well in well-drained soils.",
        ),
        crop(
            "Cotton",
            [40.0, 60.0], [20.0, 35.0], [5.8, 7.2], [100.0, 250.0], [15.0, 35.0], [150.0, 300.0],
            "Medium", "150-180 days", "2-3 tons/hectare",
            "A fiber crop that requires warm temperatures and moderate water.",
        ),
        crop(
            "Tomato",
            [50.0, 70.0], [20.0, 30.0], [6.0, 7.0], [100.0, 250.0], [20.0, 40.0], [150.0, 300.0],
            "Medium", "90-120 days", "40-60 tons/hectare",
            "A vegetable crop that requires balanced nutrients and consistent moisture.",
        ),
        crop(
            "Potato",
            [60.0, 80.0], [15.0, 25.0], [5.0, 6.5], [150.0, 300.0], [20.0, 40.0], [200.0, 350.0],
            "Medium-High", "90-120 days", "25-35 tons/hectare",
            "A tuber crop that performs well in loose, well-drained soils with good potassium levels.",
        ),
        crop(
            "Sugarcane",
            [65.0, 85.0], [25.0, 35.0], [6.0, 7.5], [150.0, 350.0], [15.0, 35.0], [150.0, 300.0],
            "High", "10-12 months", "70-100 tons/hectare",
            "A perennial crop that requires high moisture and good nitrogen levels.",
        ),
    ]
}

/// Load a replacement profile table from a JSON array
///
/// Same field layout as `/api/crop-profiles` returns. Ranges must be
/// well-formed; a malformed range rejects the whole file.
pub fn load_profiles(path: &Path) -> Result<Vec<CropProfile>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read crop profile file: {:?}", path))?;

    let profiles: Vec<CropProfile> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse crop profile JSON: {:?}", path))?;

    validate_profiles(&profiles)
        .with_context(|| format!("Invalid crop profile table: {:?}", path))?;

    Ok(profiles)
}

/// Active table for the server: the file at `path` if given, else the defaults
pub fn active_profiles(path: Option<&Path>) -> Result<Arc<[CropProfile]>> {
    match path {
        Some(path) => {
            let profiles = load_profiles(path)?;
            Ok(Arc::from(profiles))
        }
        None => Ok(Arc::from(default_profiles().to_vec())),
    }
}
