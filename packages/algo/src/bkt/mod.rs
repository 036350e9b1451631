//! Bayesian Knowledge Tracing
//!
//! Posterior mastery update for a single observed answer.
//!
//! Model:
//! - Condition the prior on the observation using guess/slip
//! - Apply the learn transition, which only moves mastery upward
//! - Cap the result at [`MASTERY_CEILING`] so the next prior never hits 1.0
//!
//! The update is pure: identical inputs always yield the identical output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sanitize::{is_probability, is_valid_param};
use crate::types::{BktParams, MasteryTransition, EPSILON, MASTERY_CEILING};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BktError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid parameter {name}: {value}")]
    InvalidParams { name: &'static str, value: f64 },
}

impl BktParams {
    /// Build a parameter set, rejecting anything outside `[0, 1)`.
    pub fn new(guess: f64, slip: f64, learn: f64) -> Result<Self, BktError> {
        for (name, value) in [("guess", guess), ("slip", slip), ("learn", learn)] {
            if !is_valid_param(value) {
                return Err(BktError::InvalidParams { name, value });
            }
        }
        Ok(Self { guess, slip, learn })
    }
}

/// Compute the next mastery probability.
///
/// Fails with [`BktError::InvalidState`] when `prior` is not a probability,
/// or when the observation is impossible under `prior` (zero evidence).
pub fn update(prior: f64, correct: bool, params: &BktParams) -> Result<f64, BktError> {
    if !is_probability(prior) {
        return Err(BktError::InvalidState(format!(
            "prior {prior} outside [0, 1]"
        )));
    }

    let (evidence_mastered, evidence_unmastered) = if correct {
        (prior * (1.0 - params.slip), (1.0 - prior) * params.guess)
    } else {
        (prior * params.slip, (1.0 - prior) * (1.0 - params.guess))
    };

    let denominator = evidence_mastered + evidence_unmastered;
    if denominator <= EPSILON {
        return Err(BktError::InvalidState(format!(
            "observation has zero likelihood at prior {prior}"
        )));
    }

    let posterior = evidence_mastered / denominator;
    let learned = posterior + (1.0 - posterior) * params.learn;

    Ok(learned.min(MASTERY_CEILING))
}

/// Probability that the next answer is correct given current mastery.
pub fn predict_correct(mastery: f64, params: &BktParams) -> f64 {
    mastery * (1.0 - params.slip) + (1.0 - mastery) * params.guess
}

/// Updater bound to one immutable parameter set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BktModel {
    params: BktParams,
}

impl BktModel {
    pub fn new(params: BktParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BktParams {
        &self.params
    }

    pub fn update(&self, prior: f64, correct: bool) -> Result<f64, BktError> {
        update(prior, correct, &self.params)
    }

    /// Same as [`BktModel::update`], keeping the prior alongside the result.
    pub fn observe(&self, prior: f64, correct: bool) -> Result<MasteryTransition, BktError> {
        let posterior = self.update(prior, correct)?;
        Ok(MasteryTransition {
            prior,
            correct,
            posterior,
        })
    }

    pub fn predict_correct(&self, mastery: f64) -> f64 {
        predict_correct(mastery, &self.params)
    }

    /// Whether `mastery` has reached `threshold`, e.g. the unlock threshold.
    pub fn is_mastered(&self, mastery: f64, threshold: f64) -> bool {
        mastery >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DEFAULT_PRIOR, UNLOCK_THRESHOLD};
    use proptest::prelude::*;

    fn defaults() -> BktParams {
        BktParams::default()
    }

    #[test]
    fn test_correct_answer_from_default_prior() {
        // 0.45 / (0.45 + 0.125) = 0.7826..., then learn: + 0.2173... * 0.2
        let p = update(DEFAULT_PRIOR, true, &defaults()).unwrap();
        let post = 0.45 / 0.575;
        let expected = post + (1.0 - post) * 0.2;
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn test_incorrect_answer_from_default_prior() {
        // 0.05 / (0.05 + 0.375) = 0.1176..., then learn
        let p = update(DEFAULT_PRIOR, false, &defaults()).unwrap();
        let post = 0.05 / 0.425;
        let expected = post + (1.0 - post) * 0.2;
        assert!((p - expected).abs() < 1e-12);
        assert!(p < DEFAULT_PRIOR);
    }

    #[test]
    fn test_ceiling_is_enforced() {
        let p = update(0.99, true, &defaults()).unwrap();
        assert_eq!(p, MASTERY_CEILING);
    }

    #[test]
    fn test_prior_out_of_range_is_invalid_state() {
        assert!(matches!(
            update(1.2, true, &defaults()),
            Err(BktError::InvalidState(_))
        ));
        assert!(matches!(
            update(-0.1, false, &defaults()),
            Err(BktError::InvalidState(_))
        ));
        assert!(matches!(
            update(f64::NAN, true, &defaults()),
            Err(BktError::InvalidState(_))
        ));
    }

    #[test]
    fn test_zero_likelihood_is_invalid_state() {
        let params = BktParams::new(0.0, 0.1, 0.2).unwrap();
        assert!(matches!(
            update(0.0, true, &params),
            Err(BktError::InvalidState(_))
        ));
    }

    #[test]
    fn test_boundary_prior_with_nonzero_evidence() {
        // prior 0 with guess > 0: posterior 0, learn lifts to exactly `learn`
        let p = update(0.0, true, &defaults()).unwrap();
        assert!((p - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_params_validation() {
        assert!(BktParams::new(0.25, 0.1, 0.2).is_ok());
        assert_eq!(
            BktParams::new(1.0, 0.1, 0.2),
            Err(BktError::InvalidParams {
                name: "guess",
                value: 1.0
            })
        );
        assert!(matches!(
            BktParams::new(0.25, -0.1, 0.2),
            Err(BktError::InvalidParams { name: "slip", .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let a = update(0.37, true, &defaults()).unwrap();
        let b = update(0.37, true, &defaults()).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_model_observe_keeps_prior() {
        let model = BktModel::default();
        let t = model.observe(0.6, true).unwrap();
        assert_eq!(t.prior, 0.6);
        assert!(t.correct);
        assert!(t.delta() > 0.0);
    }

    #[test]
    fn test_repeated_correct_answers_reach_unlock_threshold() {
        let model = BktModel::default();
        let mut p = DEFAULT_PRIOR;
        let mut steps = 0;
        while !model.is_mastered(p, UNLOCK_THRESHOLD) {
            p = model.update(p, true).unwrap();
            steps += 1;
            assert!(steps < 10);
        }
        assert!(p <= MASTERY_CEILING);
    }

    #[test]
    fn test_predict_correct() {
        let model = BktModel::default();
        assert!((model.predict_correct(0.0) - 0.25).abs() < 1e-12);
        assert!((model.predict_correct(1.0) - 0.9).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_correct_answer_never_decreases_mastery(prior in 0.001f64..0.985) {
            let p = update(prior, true, &defaults()).unwrap();
            prop_assert!(p > prior);
        }

        #[test]
        fn prop_result_stays_in_range(prior in 0.0f64..=1.0, correct in any::<bool>()) {
            let p = update(prior, correct, &defaults()).unwrap();
            prop_assert!((0.0..=MASTERY_CEILING).contains(&p));
        }

        #[test]
        fn prop_learn_term_keeps_result_above_learn(prior in 0.0f64..=0.99, correct in any::<bool>()) {
            let p = update(prior, correct, &defaults()).unwrap();
            prop_assert!(p >= defaults().learn - 1e-12);
        }
    }
}
