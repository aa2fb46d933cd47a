//! Server configuration from environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | 3000 |
//! | `PROFILES_PATH` | built-in crop table |
//! | `OTP_TTL_SECS` | 600 (at most 86400) |
//! | `RAINFALL_THRESHOLD_MM` | 10.0 |
//!
//! Unset or unparsable values fall back to the default.

use crate::alerts::DEFAULT_RAINFALL_THRESHOLD_MM;
use crate::otp::{DEFAULT_VALIDITY, MAX_VALIDITY};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub profiles_path: Option<PathBuf>,
    pub otp_validity: Duration,
    pub rainfall_threshold_mm: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            profiles_path: None,
            otp_validity: DEFAULT_VALIDITY,
            rainfall_threshold_mm: DEFAULT_RAINFALL_THRESHOLD_MM,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let profiles_path = lookup("PROFILES_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let otp_validity = lookup("OTP_TTL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
            .filter(|&validity| validity <= MAX_VALIDITY)
            .unwrap_or(defaults.otp_validity);

        let rainfall_threshold_mm = lookup("RAINFALL_THRESHOLD_MM")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|t| t.is_finite())
            .unwrap_or(defaults.rainfall_threshold_mm);

        Self {
            port,
            profiles_path,
            otp_validity,
            rainfall_threshold_mm,
        }
    }

    pub fn log(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  PORT: {}", self.port);
        match &self.profiles_path {
            Some(path) => tracing::info!("  PROFILES_PATH: {}", path.display()),
            None => tracing::info!("  PROFILES_PATH: (built-in table)"),
        }
        tracing::info!("  OTP_TTL_SECS: {}", self.otp_validity.as_secs());
        tracing::info!("  RAINFALL_THRESHOLD_MM: {}", self.rainfall_threshold_mm);
    }
}
