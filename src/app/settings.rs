use super::config::Config;
use crate::period::MonthKey;
use thiserror::Error;

/// Upper bound for the period list; keeps the dropdown navigable
pub const MAX_PERIOD_COUNT: usize = 120;

/// A configuration rule violation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Period list must offer at least one month and stay navigable
    #[error("picker.period_count must be between 1 and {max}, got {count}")]
    PeriodCountOutOfRange { count: usize, max: usize },

    /// Manifest key is not a canonical YYYY-MM key
    #[error("manifest key '{key}' is not a YYYY-MM period")]
    InvalidManifestKey { key: String },

    /// Manifest entry has no target
    #[error("manifest entry '{key}' has an empty href")]
    EmptyManifestHref { key: String },
}

/// Check every rule and report all violations at once
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let count = config.picker.period_count;
    if count == 0 || count > MAX_PERIOD_COUNT {
        errors.push(ValidationError::PeriodCountOutOfRange {
            count,
            max: MAX_PERIOD_COUNT,
        });
    }

    for (key, href) in &config.manifest {
        // Keys must round-trip so lookups by generated periods can match them
        match key.parse::<MonthKey>() {
            Ok(parsed) if parsed.to_string() == *key => {}
            _ => errors.push(ValidationError::InvalidManifestKey { key: key.clone() }),
        }
        if href.trim().is_empty() {
            errors.push(ValidationError::EmptyManifestHref { key: key.clone() });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
