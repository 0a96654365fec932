//! Shared threshold validation helpers.
//!
//! Range checks used by configurable heuristics (spam filter ratios, run
//! lengths).

use crate::error::CoreError;

/// Validate that a ratio falls within `[0.0, 1.0]`.
///
/// Returns a `CoreError::SpamConfig` naming the setting if out of range.
pub fn validate_unit_range(value: f64, name: &str) -> Result<(), CoreError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::SpamConfig(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a count-style setting is at least 1.
pub fn validate_positive(value: usize, name: &str) -> Result<(), CoreError> {
    if value == 0 {
        return Err(CoreError::SpamConfig(format!("{name} must be at least 1")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_values() {
        assert!(validate_unit_range(0.0, "test").is_ok());
        assert!(validate_unit_range(0.4, "test").is_ok());
        assert!(validate_unit_range(1.0, "test").is_ok());
    }

    #[test]
    fn rejects_outside_unit_range() {
        assert!(validate_unit_range(-0.01, "test").is_err());
        assert!(validate_unit_range(1.01, "test").is_err());
        assert!(validate_unit_range(f64::NAN, "test").is_err());
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(validate_positive(0, "run").is_err());
        assert!(validate_positive(1, "run").is_ok());
    }
}
