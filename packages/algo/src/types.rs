//! Common Types and Constants
//!
//! Shared data structures used across the mastery algorithms.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Prior assumed for a topic the learner has never touched
pub const DEFAULT_PRIOR: f64 = 0.5;

/// Upper bound of any mastery probability produced by an update
pub const MASTERY_CEILING: f64 = 0.99;

/// Predecessor mastery required to unlock the next topic
pub const UNLOCK_THRESHOLD: f64 = 0.90;

/// Default probability of a correct answer without mastery
pub const DEFAULT_GUESS: f64 = 0.25;

/// Default probability of an incorrect answer despite mastery
pub const DEFAULT_SLIP: f64 = 0.10;

/// Default probability of learning from one practice event
pub const DEFAULT_LEARN: f64 = 0.20;

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-12;

// ==================== BKT Types ====================

/// Bayesian Knowledge Tracing parameters
///
/// Fixed for the lifetime of a process. Build once at startup and pass by
/// value into whatever needs to run updates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BktParams {
    /// P(correct | not mastered)
    pub guess: f64,
    /// P(incorrect | mastered)
    pub slip: f64,
    /// P(not mastered -> mastered) after one practice event
    pub learn: f64,
}

impl Default for BktParams {
    fn default() -> Self {
        Self {
            guess: DEFAULT_GUESS,
            slip: DEFAULT_SLIP,
            learn: DEFAULT_LEARN,
        }
    }
}

/// Outcome of a single practice event fed through the updater
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MasteryTransition {
    /// Mastery before the observation
    pub prior: f64,
    /// Whether the observed answer was correct
    pub correct: bool,
    /// Mastery after conditioning and the learn step
    pub posterior: f64,
}

impl MasteryTransition {
    /// Signed change in mastery caused by this observation
    pub fn delta(&self) -> f64 {
        self.posterior - self.prior
    }
}
