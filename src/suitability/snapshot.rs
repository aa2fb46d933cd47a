//! Sensor Snapshot
//!
//! Current soil readings for one scoring request. Built per request from
//! caller-supplied telemetry and never stored.

use super::profile::Dimension;
use super::validation::{require_finite, InvalidInputError};
use serde::{Deserialize, Serialize};

/// Validated current readings (all finite)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    /// Soil moisture (0-100 %)
    pub soil_moisture_percent: f64,
    /// Soil temperature (°C)
    pub soil_temperature_celsius: f64,
    /// Soil pH (0-14)
    #[serde(rename = "soilPH")]
    pub soil_ph: f64,
    pub nitrogen_mg_per_kg: f64,
    pub phosphorus_mg_per_kg: f64,
    pub potassium_mg_per_kg: f64,
}

impl SensorSnapshot {
    /// Reading for a given dimension
    pub fn value(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Moisture => self.soil_moisture_percent,
            Dimension::Temperature => self.soil_temperature_celsius,
            Dimension::Ph => self.soil_ph,
            Dimension::Nitrogen => self.nitrogen_mg_per_kg,
            Dimension::Phosphorus => self.phosphorus_mg_per_kg,
            Dimension::Potassium => self.potassium_mg_per_kg,
        }
    }
}

/// Unvalidated snapshot as it arrives on the wire
///
/// Every field is optional so that a missing reading is reported by name
/// instead of as a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    pub soil_moisture_percent: Option<f64>,
    pub soil_temperature_celsius: Option<f64>,
    #[serde(rename = "soilPH")]
    pub soil_ph: Option<f64>,
    pub nitrogen_mg_per_kg: Option<f64>,
    pub phosphorus_mg_per_kg: Option<f64>,
    pub potassium_mg_per_kg: Option<f64>,
}

impl TryFrom<SnapshotPayload> for SensorSnapshot {
    type Error = InvalidInputError;

    fn try_from(payload: SnapshotPayload) -> Result<Self, Self::Error> {
        Ok(SensorSnapshot {
            soil_moisture_percent: require_finite(payload.soil_moisture_percent, "soilMoisturePercent")?,
            soil_temperature_celsius: require_finite(payload.soil_temperature_celsius, "soilTemperatureCelsius")?,
            soil_ph: require_finite(payload.soil_ph, "soilPH")?,
            nitrogen_mg_per_kg: require_finite(payload.nitrogen_mg_per_kg, "nitrogenMgPerKg")?,
            phosphorus_mg_per_kg: require_finite(payload.phosphorus_mg_per_kg, "phosphorusMgPerKg")?,
            potassium_mg_per_kg: require_finite(payload.potassium_mg_per_kg, "potassiumMgPerKg")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> SnapshotPayload {
        SnapshotPayload {
            soil_moisture_percent: Some(75.0),
            soil_temperature_celsius: Some(27.0),
            soil_ph: Some(6.0),
            nitrogen_mg_per_kg: Some(200.0),
            phosphorus_mg_per_kg: Some(30.0),
            potassium_mg_per_kg: Some(225.0),
        }
    }

    #[test]
    fn test_payload_converts() {
        let snapshot = SensorSnapshot::try_from(full_payload()).unwrap();
        assert_eq!(snapshot.value(Dimension::Ph), 6.0);
        assert_eq!(snapshot.value(Dimension::Potassium), 225.0);
    }

    #[test]
    fn test_missing_field_named() {
        let payload = SnapshotPayload { soil_ph: None, ..full_payload() };
        assert_eq!(
            SensorSnapshot::try_from(payload),
            Err(InvalidInputError::MissingField("soilPH"))
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let payload = SnapshotPayload { nitrogen_mg_per_kg: Some(f64::NAN), ..full_payload() };
        assert_eq!(
            SensorSnapshot::try_from(payload),
            Err(InvalidInputError::NonFinite("nitrogenMgPerKg"))
        );
    }

    #[test]
    fn test_wire_names() {
        let payload: SnapshotPayload = serde_json::from_str(
            r#"{"soilMoisturePercent": 45, "soilTemperatureCelsius": 27, "soilPH": 6.0,
                "nitrogenMgPerKg": 200, "phosphorusMgPerKg": 30, "potassiumMgPerKg": 225}"#,
        )
        .unwrap();
        assert_eq!(payload.soil_moisture_percent, Some(45.0));
        assert_eq!(payload.soil_ph, Some(6.0));
    }
}
