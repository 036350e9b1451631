//! Probability Validation
//!
//! Range checks shared by the updater and the persistence layer.
//!
//! Values are only ever checked here, never clamped: an out-of-range
//! mastery probability is a corrupted state that must be reported.

use crate::types::MASTERY_CEILING;

/// Finite and inside `[0, 1]`
pub fn is_probability(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Finite and inside `[0, MASTERY_CEILING]`
pub fn is_mastery_value(value: f64) -> bool {
    value.is_finite() && (0.0..=MASTERY_CEILING).contains(&value)
}

/// Every BKT parameter must leave room on both sides of the update.
pub fn is_valid_param(value: f64) -> bool {
    value.is_finite() && (0.0..1.0).contains(&value)
}

/// Round to one decimal place, the precision used for progress display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
