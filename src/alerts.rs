//! Heavy-rainfall alerts
//!
//! Subscribers register a phone number; a forecast check then texts every
//! subscriber when any forecast day exceeds the rainfall threshold.

use crate::otp::SmsSender;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tokio::sync::RwLock;

/// Daily precipitation above this is "heavy" (mm)
pub const DEFAULT_RAINFALL_THRESHOLD_MM: f64 = 10.0;

/// Phone numbers subscribed to weather alerts
///
/// Owned by the application state; a set, so subscribing twice is a no-op.
#[derive(Debug, Default)]
pub struct SubscriberStore {
    numbers: RwLock<BTreeSet<String>>,
}

impl SubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the number was already subscribed
    pub async fn subscribe(&self, phone: &str) -> bool {
        self.numbers.write().await.insert(phone.to_string())
    }

    pub async fn list(&self) -> Vec<String> {
        self.numbers.read().await.iter().cloned().collect()
    }
}

/// One forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: String,
    /// Total precipitation for the day (mm)
    pub total_precip: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeavyRainfallDay {
    pub date: String,
    pub precipitation: f64,
}

/// Forecast days with precipitation strictly above `threshold_mm`, in order
pub fn heavy_rainfall_days(forecast: &[ForecastDay], threshold_mm: f64) -> Vec<HeavyRainfallDay> {
    forecast
        .iter()
        .filter(|day| day.total_precip > threshold_mm)
        .map(|day| HeavyRainfallDay {
            date: day.date.clone(),
            precipitation: day.total_precip,
        })
        .collect()
}

pub fn alert_message(days: &[HeavyRainfallDay]) -> String {
    let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
    format!(
        "WEATHER ALERT: Heavy rainfall expected on {}. Please take necessary precautions for your crops.",
        dates.join(", ")
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub phone_number: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What a forecast check did
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    NoAlertsNeeded,
    NoSubscribers,
    Sent(Vec<DeliveryResult>),
}

// Wire form: a status string, or the per-subscriber results
impl Serialize for AlertOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AlertOutcome::NoAlertsNeeded => serializer.serialize_str("No alerts needed"),
            AlertOutcome::NoSubscribers => serializer.serialize_str("No subscribers"),
            AlertOutcome::Sent(results) => results.serialize(serializer),
        }
    }
}

/// Text the alert to every subscriber
///
/// A failed send is recorded in that subscriber's result and does not stop
/// the others.
pub async fn dispatch(
    days: &[HeavyRainfallDay],
    subscribers: &SubscriberStore,
    sender: &dyn SmsSender,
) -> AlertOutcome {
    if days.is_empty() {
        return AlertOutcome::NoAlertsNeeded;
    }

    let numbers = subscribers.list().await;
    if numbers.is_empty() {
        return AlertOutcome::NoSubscribers;
    }

    let message = alert_message(days);
    let results = numbers
        .into_iter()
        .map(|phone_number| match sender.send(&phone_number, &message) {
            Ok(()) => DeliveryResult { phone_number, success: true, error: None },
            Err(e) => {
                tracing::error!("Failed to send alert to {}: {:#}", phone_number, e);
                DeliveryResult { phone_number, success: false, error: Some(e.to_string()) }
            }
        })
        .collect();

    AlertOutcome::Sent(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otp::LogSmsSender;

    struct RejectingSender(&'static str);

    impl SmsSender for RejectingSender {
        fn send(&self, to: &str, _body: &str) -> anyhow::Result<()> {
            if to == self.0 {
                anyhow::bail!("unreachable number");
            }
            Ok(())
        }
    }

    fn day(date: &str, total_precip: f64) -> ForecastDay {
        ForecastDay { date: date.to_string(), total_precip }
    }

    #[test]
    fn test_threshold_is_strict() {
        let forecast = vec![day("2024-07-01", 10.0), day("2024-07-02", 10.1), day("2024-07-03", 42.0)];
        let heavy = heavy_rainfall_days(&forecast, DEFAULT_RAINFALL_THRESHOLD_MM);

        let dates: Vec<&str> = heavy.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-07-02", "2024-07-03"]);
        assert_eq!(heavy[1].precipitation, 42.0);
    }

    #[test]
    fn test_alert_message() {
        let heavy = heavy_rainfall_days(&[day("Jul 2", 15.0), day("Jul 3", 20.0)], 10.0);
        assert_eq!(
            alert_message(&heavy),
            "WEATHER ALERT: Heavy rainfall expected on Jul 2, Jul 3. Please take necessary precautions for your crops."
        );
    }

    #[tokio::test]
    async fn test_subscribe_is_idempotent() {
        let store = SubscriberStore::new();
        assert!(store.subscribe("+15550001").await);
        assert!(!store.subscribe("+15550001").await);
        assert_eq!(store.list().await, vec!["+15550001".to_string()]);
    }

    #[tokio::test]
    async fn test_dispatch_outcomes() {
        let store = SubscriberStore::new();
        let heavy = heavy_rainfall_days(&[day("Jul 2", 15.0)], 10.0);

        assert_eq!(dispatch(&[], &store, &LogSmsSender).await, AlertOutcome::NoAlertsNeeded);
        assert_eq!(dispatch(&heavy, &store, &LogSmsSender).await, AlertOutcome::NoSubscribers);

        store.subscribe("+15550001").await;
        store.subscribe("+15550002").await;

        match dispatch(&heavy, &store, &RejectingSender("+15550002")).await {
            AlertOutcome::Sent(results) => {
                assert_eq!(results.len(), 2);
                assert!(results[0].success);
                assert!(!results[1].success);
                assert!(results[1].error.is_some());
            }
            other => panic!("expected deliveries, got {:?}", other),
        }
    }

    #[test]
    fn test_outcome_wire_format() {
        assert_eq!(
            serde_json::to_value(AlertOutcome::NoAlertsNeeded).unwrap(),
            serde_json::json!("No alerts needed")
        );
        let sent = AlertOutcome::Sent(vec![DeliveryResult {
            phone_number: "+15550001".to_string(),
            success: true,
            error: None,
        }]);
        assert_eq!(
            serde_json::to_value(sent).unwrap(),
            serde_json::json!([{"phoneNumber": "+15550001", "success": true}])
        );
    }
}
