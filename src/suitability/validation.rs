//! Input validation
//!
//! The scorer assumes validated input. Everything that reaches it from the
//! outside goes through this layer first, which rejects with a structured
//! `InvalidInputError` (kind + message).

use super::profile::{CropProfile, Dimension};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidInputError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("field {0} must be a finite number")]
    NonFinite(&'static str),

    #[error("crop '{crop}' has a malformed {} ({min}, {max}): min must be below max", .dimension.range_field())]
    MalformedRange {
        crop: String,
        dimension: Dimension,
        min: f64,
        max: f64,
    },

    #[error("{0} is required")]
    MissingParameter(String),

    #[error("invalid image data: {0}")]
    InvalidImage(String),
}

impl InvalidInputError {
    /// Short machine-readable kind for response bodies
    pub fn kind(&self) -> &'static str {
        match self {
            InvalidInputError::MissingField(_) => "missing_field",
            InvalidInputError::NonFinite(_) => "non_finite",
            InvalidInputError::MalformedRange { .. } => "malformed_range",
            InvalidInputError::MissingParameter(_) => "missing_parameter",
            InvalidInputError::InvalidImage(_) => "invalid_image",
        }
    }
}

/// Require a reading to be present and finite
pub fn require_finite(value: Option<f64>, field: &'static str) -> Result<f64, InvalidInputError> {
    match value {
        None => Err(InvalidInputError::MissingField(field)),
        Some(v) if !v.is_finite() => Err(InvalidInputError::NonFinite(field)),
        Some(v) => Ok(v),
    }
}

/// Reject any profile whose ranges are not `min < max` with finite bounds
///
/// Malformed ranges are rejected rather than clamped. The first offending
/// range in table order (profile, then dimension) is reported.
pub fn validate_profiles(profiles: &[CropProfile]) -> Result<(), InvalidInputError> {
    for profile in profiles {
        for dimension in Dimension::ALL {
            let range = profile.range(dimension);
            if !range.is_well_formed() {
                return Err(InvalidInputError::MalformedRange {
                    crop: profile.name.clone(),
                    dimension,
                    min: range.min,
                    max: range.max,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::default_profiles;
    use crate::suitability::profile::OptimalRange;

    #[test]
    fn test_require_finite() {
        assert_eq!(require_finite(Some(6.5), "soilPH"), Ok(6.5));
        assert_eq!(
            require_finite(None, "soilPH"),
            Err(InvalidInputError::MissingField("soilPH"))
        );
        assert_eq!(
            require_finite(Some(f64::INFINITY), "soilPH"),
            Err(InvalidInputError::NonFinite("soilPH"))
        );
    }

    #[test]
    fn test_default_table_is_valid() {
        assert!(validate_profiles(default_profiles()).is_ok());
    }

    #[test]
    fn test_malformed_range_rejected() {
        let mut profiles = default_profiles().to_vec();
        profiles[1].ph_range = OptimalRange::new(7.5, 6.0);

        let err = validate_profiles(&profiles).unwrap_err();
        assert_eq!(err.kind(), "malformed_range");
        assert!(err.to_string().contains("Wheat"));
        assert!(err.to_string().contains("phRange"));
    }

    #[test]
    fn test_degenerate_range_rejected() {
        let mut profiles = default_profiles().to_vec();
        profiles[0].nitrogen_range = OptimalRange::new(120.0, 120.0);
        assert!(validate_profiles(&profiles).is_err());
    }

    #[test]
    fn test_empty_table_is_valid() {
        assert!(validate_profiles(&[]).is_ok());
    }
}
