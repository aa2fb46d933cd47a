//! Crop Scorer
//!
//! Backend for a farmer dashboard. The core is a deterministic scorer that
//! ranks candidate crops against current soil telemetry:
//! - `suitability/`: profiles, snapshot validation, range comparison, ranking
//! - `profiles`: the built-in crop table and JSON table loading
//!
//! Around it sit simulated feeds (`sensors`, `market`, `crop_health`) and,
//! behind the `api` feature, the HTTP server with phone verification (`otp`)
//! and rainfall alerts (`alerts`).

pub mod suitability;
pub mod profiles;
pub mod sensors;
pub mod market;
pub mod crop_health;

#[cfg(feature = "api")]
pub mod config;
#[cfg(feature = "api")]
pub mod otp;
#[cfg(feature = "api")]
pub mod alerts;
#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use suitability::{
    range_score, score, CropProfile, CropRecommendation, Dimension, InvalidInputError,
    OptimalRange, SensorSnapshot, SnapshotPayload,
};
pub use profiles::{default_profiles, load_profiles};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppError, AppState};
#[cfg(feature = "api")]
pub use config::ServerConfig;
