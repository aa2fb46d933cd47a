// Axum API server for the farmer dashboard
//
// Crop recommendations from soil telemetry, plus the simulated sensor,
// market and crop-health feeds, phone verification and rainfall alerts.
// Every response body carries `success`; failures carry `message`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::alerts::{dispatch, heavy_rainfall_days, ForecastDay, SubscriberStore};
use crate::config::ServerConfig;
use crate::crop_health::{simulate_analysis, validate_image};
use crate::market::simulate_market_data;
use crate::otp::{LogSmsSender, OtpError, OtpStore, SmsSender};
use crate::profiles::active_profiles;
use crate::sensors::{simulate_sensor_data, Location, SensorData};
use crate::suitability::{
    rank_all, CropProfile, InvalidInputError, SensorSnapshot, SnapshotPayload, MAX_RECOMMENDATIONS,
};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    /// Active crop profile table, read-only after startup
    pub profiles: Arc<[CropProfile]>,
    pub otp: Arc<OtpStore>,
    pub subscribers: Arc<SubscriberStore>,
    pub sms: Arc<dyn SmsSender>,
    pub rainfall_threshold_mm: f64,
}

impl AppState {
    /// Load the profile table and build the stores, sending SMS to the log
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading crop profiles...");
        let profiles = active_profiles(config.profiles_path.as_deref())?;
        tracing::info!("Loaded {} crop profiles", profiles.len());

        Ok(Self::with_parts(profiles, config, Arc::new(LogSmsSender)))
    }

    /// Assemble state from an already-loaded table and a given SMS channel
    pub fn with_parts(
        profiles: Arc<[CropProfile]>,
        config: &ServerConfig,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        tracing::info!("Initializing OTP store (validity {}s)...", config.otp_validity.as_secs());
        let otp = Arc::new(OtpStore::new(config.otp_validity, sms.clone()));

        Self {
            profiles,
            otp,
            subscribers: Arc::new(SubscriberStore::new()),
            sms,
            rainfall_threshold_mm: config.rainfall_threshold_mm,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))

        // Crop suitability
        .route("/api/crop-recommendations", post(crop_recommendations))
        .route("/api/crop-profiles", get(crop_profiles))

        // Simulated feeds
        .route("/api/sensor-data", get(sensor_data))
        .route("/api/market-prices", get(market_prices))
        .route("/api/analyze-crop", post(analyze_crop))

        // Phone verification
        .route("/api/send-otp", post(send_otp))
        .route("/api/verify-otp", post(verify_otp))

        // Weather alerts
        .route("/api/subscribe-alerts", post(subscribe_alerts))
        .route("/api/check-rainfall-alerts", post(check_rainfall_alerts))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Rank crops for the current readings
///
/// Accepts either a flat `snapshot` or the dashboard's `sensorData` feed
/// with a `location`; a snapshot wins when both are present.
async fn crop_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(request) = payload?;

    let raw = match (request.snapshot, request.sensor_data, request.location) {
        (Some(snapshot), _, _) => snapshot,
        (None, Some(sensor_data), Some(_location)) => sensor_data.latest_snapshot(),
        _ => {
            return Err(AppError::BadRequest(
                "Sensor data and location are required".to_string(),
            ))
        }
    };
    let snapshot = SensorSnapshot::try_from(raw)?;

    let recommendations: Vec<_> = rank_all(&snapshot, &state.profiles)
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(recommendation, scores)| {
            if request.include_breakdown {
                recommendation.with_breakdown(scores)
            } else {
                recommendation
            }
        })
        .collect();

    tracing::debug!(
        "Ranked {} profiles, top: {:?}",
        state.profiles.len(),
        recommendations.first().map(|r| (&r.name, r.suitability_score))
    );

    Ok(Json(json!({
        "success": true,
        "recommendations": recommendations,
    })))
}

async fn crop_profiles(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "profiles": &*state.profiles,
    }))
}

async fn sensor_data(
    query: Result<Query<CoordinatesQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Query(query) = query?;
    let location = query.location()?;
    tracing::debug!("Simulating sensor data at {:?}", location);

    let data = simulate_sensor_data(chrono::Utc::now(), &mut rand::thread_rng());

    Ok(Json(json!({
        "success": true,
        "sensorData": data,
    })))
}

async fn market_prices(
    query: Result<Query<CoordinatesQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Query(query) = query?;
    let location = query.location()?;
    let market_data = simulate_market_data(location.lat, location.lng, &mut rand::thread_rng());

    Ok(Json(json!({
        "success": true,
        "marketData": market_data,
    })))
}

async fn analyze_crop(
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(request) = payload?;
    validate_image(request.image.as_deref())?;

    let result = simulate_analysis(&mut rand::thread_rng());
    tracing::info!("Crop analysis: {} ({})", result.crop_type, result.health_score);

    Ok(Json(json!({
        "success": true,
        "result": result,
    })))
}

async fn send_otp(
    State(state): State<AppState>,
    payload: Result<Json<PhoneRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(request) = payload?;
    let phone = request.phone()?;

    state.otp.issue(phone).await?;

    Ok(Json(json!({
        "success": true,
        "message": "OTP sent successfully",
    })))
}

async fn verify_otp(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(request) = payload?;

    let (phone, code) = match (non_empty(&request.phone_number), non_empty(&request.otp)) {
        (Some(phone), Some(code)) => (phone, code),
        _ => {
            return Err(AppError::BadRequest(
                "Phone number and OTP are required".to_string(),
            ))
        }
    };

    state.otp.verify(phone, code).await?;
    tracing::info!("Verified phone number {}", phone);

    Ok(Json(json!({
        "success": true,
        "message": "Phone number verified successfully",
    })))
}

async fn subscribe_alerts(
    State(state): State<AppState>,
    payload: Result<Json<PhoneRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(request) = payload?;
    let phone = request.phone()?;

    if state.subscribers.subscribe(phone).await {
        tracing::info!("New weather alert subscriber: {}", phone);
    }

    Ok(Json(json!({
        "success": true,
        "message": "Successfully subscribed to weather alerts",
    })))
}

async fn check_rainfall_alerts(
    State(state): State<AppState>,
    payload: Result<Json<RainfallRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(request) = payload?;
    let forecast = request
        .forecast
        .ok_or_else(|| AppError::BadRequest("Forecast is required".to_string()))?;

    let heavy_days = heavy_rainfall_days(&forecast, state.rainfall_threshold_mm);
    let alerts_sent = dispatch(&heavy_days, &state.subscribers, state.sms.as_ref()).await;

    tracing::info!(
        "Rainfall check: {} of {} days above {} mm",
        heavy_days.len(),
        forecast.len(),
        state.rainfall_threshold_mm
    );

    Ok(Json(json!({
        "success": true,
        "heavyRainfallDays": heavy_days,
        "alertsSent": alerts_sent,
    })))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationRequest {
    snapshot: Option<SnapshotPayload>,
    sensor_data: Option<SensorData>,
    location: Option<Location>,
    #[serde(default)]
    include_breakdown: bool,
}

/// `lat`/`lng` query parameters, kept as text so a bad value is a 400
/// with the same message as a missing one
#[derive(Deserialize)]
struct CoordinatesQuery {
    lat: Option<String>,
    lng: Option<String>,
}

impl CoordinatesQuery {
    fn location(&self) -> Result<Location, AppError> {
        let parse = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|x| x.is_finite())
        };

        match (parse(&self.lat), parse(&self.lng)) {
            (Some(lat), Some(lng)) => Ok(Location { lat, lng }),
            _ => Err(AppError::BadRequest(
                "Latitude and longitude are required".to_string(),
            )),
        }
    }
}

#[derive(Deserialize)]
struct ImageRequest {
    image: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhoneRequest {
    phone_number: Option<String>,
}

impl PhoneRequest {
    fn phone(&self) -> Result<&str, AppError> {
        non_empty(&self.phone_number)
            .ok_or_else(|| AppError::BadRequest("Phone number is required".to_string()))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest {
    phone_number: Option<String>,
    otp: Option<String>,
}

#[derive(Deserialize)]
struct RainfallRequest {
    forecast: Option<Vec<ForecastDay>>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// Validation failure; the body also carries its `kind`
    InvalidInput(InvalidInputError),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": msg }),
            ),
            AppError::InvalidInput(err) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "kind": err.kind(), "message": err.to_string() }),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "message": msg }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<InvalidInputError> for AppError {
    fn from(err: InvalidInputError) -> Self {
        AppError::InvalidInput(err)
    }
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::Delivery(_) => AppError::Internal(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}
