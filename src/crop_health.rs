//! Crop Health Analysis
//!
//! Simulated analysis of an uploaded crop photo. No image model runs here:
//! the result is drawn at random from fixed catalogues so the dashboard has
//! something realistic to render until a vision model is wired in.

use crate::suitability::InvalidInputError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

const CROPS: [&str; 8] = ["Rice", "Wheat", "Maize", "Cotton", "Tomato", "Potato", "Soybean", "Sugarcane"];

const GROWTH_STAGES: [&str; 5] = ["Seedling", "Vegetative", "Flowering", "Fruiting", "Mature"];

/// Scores at or above this are reported disease-free
const DISEASE_FREE_SCORE: u8 = 85;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disease {
    pub name: String,
    pub description: String,
    /// Detection confidence (%)
    pub confidence: u8,
}

fn disease_catalogue() -> Vec<Disease> {
    [
        ("Leaf Blight", "A fungal disease that causes brown spots on leaves, eventually leading to leaf death.", 85),
        ("Powdery Mildew", "A fungal disease that appears as white powdery spots on leaves and stems.", 92),
        ("Bacterial Wilt", "A bacterial disease causing wilting and yellowing of leaves, eventually killing the plant.", 78),
        ("Aphid Infestation", "Small insects that suck sap from plants, causing leaf curling and stunted growth.", 88),
        ("Root Rot", "A fungal disease affecting the roots, causing them to decay and the plant to wilt.", 75),
    ]
    .into_iter()
    .map(|(name, description, confidence)| Disease {
        name: name.to_string(),
        description: description.to_string(),
        confidence,
    })
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    #[serde(rename = "Moderate Issues")]
    ModerateIssues,
    Unhealthy,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => HealthStatus::Healthy,
            40..=69 => HealthStatus::ModerateIssues,
            _ => HealthStatus::Unhealthy,
        }
    }

    fn summary(&self, crop: &str, stage: &str) -> String {
        match self {
            HealthStatus::Healthy => format!(
                "Your {} crop is in good health at the {} stage. Continue with your current management practices.",
                crop, stage
            ),
            HealthStatus::ModerateIssues => format!(
                "Your {} crop shows some signs of stress at the {} stage. Check the recommendations for improvement.",
                crop, stage
            ),
            HealthStatus::Unhealthy => format!(
                "Your {} crop is showing significant health issues at the {} stage. Immediate action is recommended.",
                crop, stage
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentKind {
    Pesticide,
    Fertilizer,
    Irrigation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub quantity: String,
    pub store_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Treatment {
    #[serde(rename = "type")]
    pub kind: TreatmentKind,
    pub title: String,
    pub description: String,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropHealthReport {
    pub crop_type: String,
    pub growth_stage: String,
    pub health_score: u8,
    pub health_status: HealthStatus,
    pub summary: String,
    pub diseases: Vec<Disease>,
    pub recommendations: Vec<Treatment>,
}

fn product(name: String, quantity: &str, store_info: &str) -> Product {
    Product {
        name,
        quantity: quantity.to_string(),
        store_info: store_info.to_string(),
    }
}

/// Check an uploaded image payload
///
/// Accepts raw data or a data URL; a data URL must carry a non-empty,
/// standard base64 payload after the comma.
pub fn validate_image(image: Option<&str>) -> Result<(), InvalidInputError> {
    let image = match image.map(str::trim) {
        Some(image) if !image.is_empty() => image,
        _ => return Err(InvalidInputError::MissingParameter("Image data".to_string())),
    };

    if image.starts_with("data:") {
        let payload = match image.split_once(',') {
            Some((_, payload)) if !payload.is_empty() => payload,
            _ => {
                return Err(InvalidInputError::InvalidImage(
                    "data URL has no payload".to_string(),
                ))
            }
        };

        STANDARD
            .decode(payload)
            .map_err(|e| InvalidInputError::InvalidImage(format!("payload is not base64: {}", e)))?;
    }

    Ok(())
}

/// Build the report for a given crop, stage and health score
pub fn build_report(crop: &str, stage: &str, health_score: u8, diseases: Vec<Disease>) -> CropHealthReport {
    let health_status = HealthStatus::from_score(health_score);

    let mut recommendations: Vec<Treatment> = diseases
        .iter()
        .map(|disease| Treatment {
            kind: TreatmentKind::Pesticide,
            title: format!("Treat {}", disease.name),
            description: format!(
                "Apply appropriate fungicide or pesticide to control {}.",
                disease.name
            ),
            products: vec![
                product(
                    format!("Premium {} Control", disease.name),
                    "250ml per acre",
                    "Agricultural Supply Store (2.5km away)",
                ),
                product(
                    format!("Organic {} Solution", disease.name),
                    "500ml per acre",
                    "Organic Farming Center (5.1km away)",
                ),
            ],
        })
        .collect();

    recommendations.push(Treatment {
        kind: TreatmentKind::Fertilizer,
        title: "Nutrient Management".to_string(),
        description: format!(
            "Apply balanced fertilizer suitable for {} at the {} stage.",
            crop, stage
        ),
        products: vec![
            product(
                format!("{} Growth Formula", crop),
                "25kg per acre",
                "District Agricultural Center (3.2km away)",
            ),
            product(
                "NPK 14-14-14 Balanced Fertilizer".to_string(),
                "30kg per acre",
                "Farmers Cooperative (1.8km away)",
            ),
        ],
    });

    recommendations.push(Treatment {
        kind: TreatmentKind::Irrigation,
        title: "Water Management".to_string(),
        description: if health_score < 50 {
            "Adjust irrigation schedule to provide consistent moisture.".to_string()
        } else {
            "Maintain current irrigation practices.".to_string()
        },
        products: Vec::new(),
    });

    CropHealthReport {
        crop_type: crop.to_string(),
        growth_stage: stage.to_string(),
        health_score,
        health_status,
        summary: health_status.summary(crop, stage),
        diseases,
        recommendations,
    }
}

/// Simulate an analysis result
///
/// Scores below 85 detect one disease, below 40 two distinct diseases.
pub fn simulate_analysis<R: Rng>(rng: &mut R) -> CropHealthReport {
    let crop = CROPS.choose(rng).copied().unwrap_or("Rice");
    let stage = GROWTH_STAGES.choose(rng).copied().unwrap_or("Vegetative");
    let health_score: u8 = rng.gen_range(0..=100);

    let disease_count = match health_score {
        s if s >= DISEASE_FREE_SCORE => 0,
        s if s < 40 => 2,
        _ => 1,
    };

    let diseases: Vec<Disease> = disease_catalogue()
        .choose_multiple(rng, disease_count)
        .cloned()
        .collect();

    build_report(crop, stage, health_score, diseases)
}
