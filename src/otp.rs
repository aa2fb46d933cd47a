//! One-Time Password Gate
//!
//! Issues 6-digit verification codes by SMS and checks them. Pending codes
//! live in an injected, TTL-bounded Moka cache owned by the application
//! state, keyed by phone number. A code is single-use: a successful verify
//! removes it, and so does a verify after expiry.

use chrono::{DateTime, Utc};
use moka::future::Cache;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default validity of an issued code (10 minutes)
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(10 * 60);

/// Longest validity accepted for an issued code (24 hours)
pub const MAX_VALIDITY: Duration = Duration::from_secs(24 * 60 * 60);

/// Maximum number of outstanding codes held at once
const MAX_PENDING_CODES: u64 = 100_000;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("No OTP found for this phone number. Please request a new one.")]
    NotFound,
    #[error("OTP has expired. Please request a new one.")]
    Expired,
    #[error("Invalid OTP. Please try again.")]
    Mismatch,
    #[error("Failed to send OTP. Please try again.")]
    Delivery(String),
}

/// Outbound SMS channel
pub trait SmsSender: Send + Sync {
    fn send(&self, to: &str, body: &str) -> anyhow::Result<()>;
}

/// Development sender: writes the message to the log instead of sending it
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSmsSender;

impl SmsSender for LogSmsSender {
    fn send(&self, to: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!("[DEV MODE] SMS to {}: {}", to, body);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct PendingCode {
    code: String,
    expires_at: DateTime<Utc>,
}

/// Random 6-digit code (100000-999999)
pub fn generate_code<R: Rng>(rng: &mut R) -> String {
    rng.gen_range(100_000..=999_999u32).to_string()
}

/// Validity in whole minutes, rounded up; seconds below one minute
fn validity_text(validity: Duration) -> String {
    let secs = validity.as_secs();
    match secs {
        0..=59 => format!("{} seconds", secs),
        60 => "1 minute".to_string(),
        _ => format!("{} minutes", secs.div_ceil(60)),
    }
}

fn verification_message(code: &str, validity: Duration) -> String {
    format!(
        "Your AgriTech verification code is: {}. Valid for {}.",
        code,
        validity_text(validity)
    )
}

pub struct OtpStore {
    pending: Cache<String, PendingCode>,
    sender: Arc<dyn SmsSender>,
    validity: Duration,
}

impl OtpStore {
    /// Validity is capped at `MAX_VALIDITY`
    pub fn new(validity: Duration, sender: Arc<dyn SmsSender>) -> Self {
        let validity = validity.min(MAX_VALIDITY);

        // Entries outlive their validity so a late verify reports Expired
        // rather than NotFound; the cache TTL only bounds memory.
        let pending = Cache::builder()
            .max_capacity(MAX_PENDING_CODES)
            .time_to_live(validity.saturating_mul(2))
            .build();

        Self { pending, sender, validity }
    }

    /// Issue a fresh code for `phone` and send it
    ///
    /// Replaces any code still pending for the same number.
    pub async fn issue(&self, phone: &str) -> Result<(), OtpError> {
        let code = generate_code(&mut rand::thread_rng());
        self.issue_code(phone, code, Utc::now()).await
    }

    /// Store and send a specific code, as of `now`
    pub async fn issue_code(&self, phone: &str, code: String, now: DateTime<Utc>) -> Result<(), OtpError> {
        let validity = chrono::Duration::from_std(self.validity)
            .map_err(|e| OtpError::Delivery(e.to_string()))?;
        let message = verification_message(&code, self.validity);

        self.pending
            .insert(
                phone.to_string(),
                PendingCode { code, expires_at: now + validity },
            )
            .await;

        if let Err(e) = self.sender.send(phone, &message) {
            tracing::error!("Error sending OTP to {}: {:#}", phone, e);
            return Err(OtpError::Delivery(e.to_string()));
        }

        tracing::debug!("Issued OTP for {}", phone);
        Ok(())
    }

    /// Check a code against the pending one for `phone`
    pub async fn verify(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        self.verify_at(phone, code, Utc::now()).await
    }

    /// Check a code as of `now`
    pub async fn verify_at(&self, phone: &str, code: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
        let key = phone.to_string();
        let pending = self.pending.get(&key).await.ok_or(OtpError::NotFound)?;

        if now > pending.expires_at {
            self.pending.invalidate(&key).await;
            return Err(OtpError::Expired);
        }

        if pending.code != code {
            return Err(OtpError::Mismatch);
        }

        self.pending.invalidate(&key).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    /// Captures outgoing messages
    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl SmsSender for RecordingSender {
        fn send(&self, to: &str, body: &str) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push((to.to_string(), body.to_string()));
            Ok(())
        }
    }

    struct FailingSender;

    impl SmsSender for FailingSender {
        fn send(&self, _to: &str, _body: &str) -> anyhow::Result<()> {
            anyhow::bail!("gateway unreachable")
        }
    }

    const PHONE: &str = "+919876543210";

    #[test]
    fn test_generated_codes_are_six_digits() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            let code = generate_code(&mut rng);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[tokio::test]
    async fn test_issue_sends_message() {
        let sender = Arc::new(RecordingSender::default());
        let store = OtpStore::new(DEFAULT_VALIDITY, sender.clone());

        store.issue_code(PHONE, "123456".to_string(), Utc::now()).await.unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, PHONE);
        assert_eq!(
            sent[0].1,
            "Your AgriTech verification code is: 123456. Valid for 10 minutes."
        );
    }

    #[test]
    fn test_validity_text_rounds_up() {
        assert_eq!(validity_text(Duration::from_secs(600)), "10 minutes");
        assert_eq!(validity_text(Duration::from_secs(60)), "1 minute");
        assert_eq!(validity_text(Duration::from_secs(90)), "2 minutes");
        assert_eq!(validity_text(Duration::from_secs(30)), "30 seconds");
    }

    #[tokio::test]
    async fn test_short_validity_message() {
        let sender = Arc::new(RecordingSender::default());
        let store = OtpStore::new(Duration::from_secs(45), sender.clone());
        store.issue_code(PHONE, "246810".to_string(), Utc::now()).await.unwrap();

        let sent = sender.sent.lock().unwrap();
        assert_eq!(
            sent[0].1,
            "Your AgriTech verification code is: 246810. Valid for 45 seconds."
        );
    }

    #[tokio::test]
    async fn test_huge_validity_is_capped() {
        let store = OtpStore::new(Duration::from_secs(u64::MAX), Arc::new(LogSmsSender));
        let issued = Utc::now();
        store.issue_code(PHONE, "135790".to_string(), issued).await.unwrap();

        let after_cap = issued + chrono::Duration::hours(25);
        assert_eq!(store.verify_at(PHONE, "135790", after_cap).await, Err(OtpError::Expired));
    }

    #[tokio::test]
    async fn test_verify_is_single_use() {
        let store = OtpStore::new(DEFAULT_VALIDITY, Arc::new(LogSmsSender));
        store.issue_code(PHONE, "654321".to_string(), Utc::now()).await.unwrap();

        assert_eq!(store.verify(PHONE, "654321").await, Ok(()));
        assert_eq!(store.verify(PHONE, "654321").await, Err(OtpError::NotFound));
    }

    #[tokio::test]
    async fn test_wrong_code_keeps_pending() {
        let store = OtpStore::new(DEFAULT_VALIDITY, Arc::new(LogSmsSender));
        store.issue_code(PHONE, "111111".to_string(), Utc::now()).await.unwrap();

        assert_eq!(store.verify(PHONE, "222222").await, Err(OtpError::Mismatch));
        assert_eq!(store.verify(PHONE, "111111").await, Ok(()));
    }

    #[tokio::test]
    async fn test_expired_code_removed() {
        let store = OtpStore::new(DEFAULT_VALIDITY, Arc::new(LogSmsSender));
        let issued = Utc::now();
        store.issue_code(PHONE, "333333".to_string(), issued).await.unwrap();

        let late = issued + chrono::Duration::minutes(11);
        assert_eq!(store.verify_at(PHONE, "333333", late).await, Err(OtpError::Expired));
        assert_eq!(store.verify_at(PHONE, "333333", issued).await, Err(OtpError::NotFound));
    }

    #[tokio::test]
    async fn test_reissue_replaces_code() {
        let store = OtpStore::new(DEFAULT_VALIDITY, Arc::new(LogSmsSender));
        let now = Utc::now();
        store.issue_code(PHONE, "444444".to_string(), now).await.unwrap();
        store.issue_code(PHONE, "555555".to_string(), now).await.unwrap();

        assert_eq!(store.verify(PHONE, "444444").await, Err(OtpError::Mismatch));
        assert_eq!(store.verify(PHONE, "555555").await, Ok(()));
    }

    #[tokio::test]
    async fn test_delivery_failure() {
        let store = OtpStore::new(DEFAULT_VALIDITY, Arc::new(FailingSender));
        let err = store.issue(PHONE).await.unwrap_err();
        assert!(matches!(err, OtpError::Delivery(_)));
        assert_eq!(err.to_string(), "Failed to send OTP. Please try again.");
    }
}
