//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Maximum length of a flag or config key.
pub const MAX_KEY_LENGTH: usize = 100;

lazy_static::lazy_static! {
    /// Flag and config keys: lowercase alphanumeric first, then `_`, `.` or `-`.
    pub static ref KEY_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9][a-z0-9_.-]*$").unwrap();
}

/// Validates a flag or config key against `KEY_REGEX` and `MAX_KEY_LENGTH`.
pub fn validate_key(key: &str) -> Result<(), ValidationError> {
    if key.len() <= MAX_KEY_LENGTH && KEY_REGEX.is_match(key) {
        Ok(())
    } else {
        let mut err = ValidationError::new("key_format");
        err.message = Some(
            "Key must be lowercase alphanumeric and may contain '_', '.' or '-'".into(),
        );
        Err(err)
    }
}

/// Validates that a rollout percentage is within valid range (0 to 100).
pub fn validate_rollout_percentage(percentage: i32) -> Result<(), ValidationError> {
    if (0..=100).contains(&percentage) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rollout_range");
        err.message = Some("Rollout percentage must be between 0 and 100".into());
        Err(err)
    }
}

/// Validates that a schedule window, when both ends are set, opens before it closes.
pub fn validate_schedule_window(
    enable_at: Option<DateTime<Utc>>,
    disable_at: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (enable_at, disable_at) {
        (Some(start), Some(end)) if start >= end => {
            let mut err = ValidationError::new("schedule_window");
            err.message = Some("enable_at must be earlier than disable_at".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
