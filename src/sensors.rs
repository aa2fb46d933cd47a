//! Soil Sensor Telemetry
//!
//! Wire format of the field sensor feed (24 hourly readings per series plus a
//! nutrient panel), extraction of the latest readings into a scoring
//! snapshot, and a simulated feed standing in for real IoT devices.

use crate::suitability::SnapshotPayload;
use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of hourly readings in a simulated series
pub const SERIES_HOURS: i64 = 24;

/// One timestamped reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Display time, e.g. "02:00 PM"
    #[serde(default)]
    pub timestamp: String,
    pub value: f64,
}

/// NPK panel (mg/kg)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilNutrients {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

/// Sensor feed for one field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorData {
    #[serde(default)]
    pub soil_moisture: Vec<Reading>,
    #[serde(default)]
    pub soil_temperature: Vec<Reading>,
    #[serde(default, rename = "soilPH")]
    pub soil_ph: Vec<Reading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_nutrients: Option<SoilNutrients>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Field coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl SensorData {
    /// Latest reading of each series plus the nutrient panel
    ///
    /// An empty series or absent nutrient panel leaves the matching fields
    /// unset so validation can name them.
    pub fn latest_snapshot(&self) -> SnapshotPayload {
        let latest = |series: &[Reading]| series.last().map(|r| r.value);

        SnapshotPayload {
            soil_moisture_percent: latest(&self.soil_moisture),
            soil_temperature_celsius: latest(&self.soil_temperature),
            soil_ph: latest(&self.soil_ph),
            nitrogen_mg_per_kg: self.soil_nutrients.map(|n| n.nitrogen),
            phosphorus_mg_per_kg: self.soil_nutrients.map(|n| n.phosphorus),
            potassium_mg_per_kg: self.soil_nutrients.map(|n| n.potassium),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Moisture follows evaporation: drier mid-day, wetter overnight
fn base_moisture(hour: u32) -> f64 {
    match hour {
        10..=16 => 40.0,
        h if h >= 18 || h <= 5 => 55.0,
        _ => 50.0,
    }
}

/// Temperature peaks in the afternoon and dips before dawn
fn base_temperature(hour: u32) -> f64 {
    match hour {
        12..=16 => 30.0,
        0..=5 => 20.0,
        _ => 25.0,
    }
}

/// Simulate 24 hourly readings ending at `now`
///
/// Bounds: moisture 30-70 % (integer), temperature 15-35 °C and pH 5.5-7.5
/// (one decimal), N 150-350, P 10-40, K 150-300 mg/kg (integer).
pub fn simulate_sensor_data<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> SensorData {
    let mut data = SensorData::default();

    for hours_ago in (0..SERIES_HOURS).rev() {
        let at = now - Duration::hours(hours_ago);
        let timestamp = at.format("%I:%M %p").to_string();
        let hour = at.hour();

        let moisture = (base_moisture(hour) + rng.gen_range(-5.0..5.0)).clamp(30.0, 70.0);
        data.soil_moisture.push(Reading {
            timestamp: timestamp.clone(),
            value: moisture.round(),
        });

        let temperature = (base_temperature(hour) + rng.gen_range(-2.0..2.0)).clamp(15.0, 35.0);
        data.soil_temperature.push(Reading {
            timestamp: timestamp.clone(),
            value: round_to(temperature, 1),
        });

        let ph = (6.5 + rng.gen_range(-0.2..0.2_f64)).clamp(5.5, 7.5);
        data.soil_ph.push(Reading {
            timestamp,
            value: round_to(ph, 1),
        });
    }

    data.soil_nutrients = Some(SoilNutrients {
        nitrogen: (150.0 + rng.gen_range(0.0..200.0_f64)).round(),
        phosphorus: (10.0 + rng.gen_range(0.0..30.0_f64)).round(),
        potassium: (150.0 + rng.gen_range(0.0..150.0_f64)).round(),
    });
    data.last_updated = Some(now.format("%b %-d, %Y, %I:%M:%S %p").to_string());

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suitability::{InvalidInputError, SensorSnapshot};
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_simulated_series_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = simulate_sensor_data(noon(), &mut rng);

        assert_eq!(data.soil_moisture.len(), 24);
        assert_eq!(data.soil_temperature.len(), 24);
        assert_eq!(data.soil_ph.len(), 24);
        assert_eq!(data.soil_moisture.last().unwrap().timestamp, "12:00 PM");
        assert_eq!(data.soil_moisture[0].timestamp, "01:00 PM");
        assert_eq!(data.last_updated.as_deref(), Some("Jun 1, 2024, 12:00:00 PM"));
    }

    #[test]
    fn test_simulated_values_in_bounds() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let data = simulate_sensor_data(noon(), &mut rng);

            assert!(data.soil_moisture.iter().all(|r| (30.0..=70.0).contains(&r.value)));
            assert!(data.soil_moisture.iter().all(|r| r.value.fract() == 0.0));
            assert!(data.soil_temperature.iter().all(|r| (15.0..=35.0).contains(&r.value)));
            assert!(data.soil_ph.iter().all(|r| (5.5..=7.5).contains(&r.value)));

            let n = data.soil_nutrients.unwrap();
            assert!((150.0..=350.0).contains(&n.nitrogen));
            assert!((10.0..=40.0).contains(&n.phosphorus));
            assert!((150.0..=300.0).contains(&n.potassium));
        }
    }

    #[test]
    fn test_seeded_simulation_is_reproducible() {
        let a = simulate_sensor_data(noon(), &mut StdRng::seed_from_u64(42));
        let b = simulate_sensor_data(noon(), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_latest_snapshot_uses_last_reading() {
        let mut data = simulate_sensor_data(noon(), &mut StdRng::seed_from_u64(1));
        data.soil_ph.push(Reading { timestamp: "later".to_string(), value: 5.9 });

        let snapshot = SensorSnapshot::try_from(data.latest_snapshot()).unwrap();
        assert_eq!(snapshot.soil_ph, 5.9);
        assert_eq!(
            snapshot.soil_moisture_percent,
            data.soil_moisture.last().unwrap().value
        );
    }

    #[test]
    fn test_empty_series_reported_missing() {
        let data = SensorData {
            soil_moisture: vec![Reading { timestamp: String::new(), value: 50.0 }],
            soil_temperature: vec![],
            soil_ph: vec![Reading { timestamp: String::new(), value: 6.5 }],
            soil_nutrients: Some(SoilNutrients { nitrogen: 200.0, phosphorus: 30.0, potassium: 200.0 }),
            last_updated: None,
        };
        assert_eq!(
            SensorSnapshot::try_from(data.latest_snapshot()),
            Err(InvalidInputError::MissingField("soilTemperatureCelsius"))
        );
    }

    #[test]
    fn test_sensor_data_wire_names() {
        let data: SensorData = serde_json::from_str(
            r#"{"soilMoisture": [{"timestamp": "10:00 AM", "value": 62}],
                "soilTemperature": [{"value": 24.5}],
                "soilPH": [{"value": 6.1}],
                "soilNutrients": {"nitrogen": 180, "phosphorus": 25, "potassium": 210}}"#,
        )
        .unwrap();

        let payload = data.latest_snapshot();
        assert_eq!(payload.soil_moisture_percent, Some(62.0));
        assert_eq!(payload.soil_temperature_celsius, Some(24.5));
        assert_eq!(payload.potassium_mg_per_kg, Some(210.0));
    }
}
