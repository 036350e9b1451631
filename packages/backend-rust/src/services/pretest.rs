//! Diagnostic pretest
//!
//! Seeds initial per-topic mastery from one diagnostic submission and
//! records the learner's normalized score.
//!
//! Seeding is a heuristic prior, not a BKT update:
//! - correct answer  -> 0.75
//! - incorrect answer -> 0.20
//!
//! Topic ids are not checked against the catalog here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::curriculum::Question;
use crate::services::mastery_store::upsert_pretest;
use crate::services::{diagnostic, MasteryError};
use crate::state::AppState;

pub const PRETEST_CORRECT_PRIOR: f64 = 0.75;
pub const PRETEST_INCORRECT_PRIOR: f64 = 0.20;

/// What to do when a learner submits the diagnostic a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticPolicy {
    /// Fail with `AlreadyCompleted` and leave every record untouched.
    #[default]
    RejectResubmission,
    /// Re-score and re-seed as if it were the first submission.
    AllowOverride,
}

impl DiagnosticPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" | "reject_resubmission" => Some(Self::RejectResubmission),
            "override" | "allow_override" => Some(Self::AllowOverride),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PretestResponse {
    pub topic_id: String,
    pub submitted: String,
    pub correct_answer: String,
}

impl PretestResponse {
    pub fn new(
        topic_id: impl Into<String>,
        submitted: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            topic_id: topic_id.into(),
            submitted: submitted.into(),
            correct_answer: correct_answer.into(),
        }
    }
}

/// Pair each diagnostic question with the learner's answer, keyed by
/// question id. An unanswered question is submitted as empty and scores as
/// incorrect.
pub fn responses_from_answers(
    questions: &[Question],
    answers: &HashMap<i64, String>,
) -> Vec<PretestResponse> {
    questions
        .iter()
        .map(|q| PretestResponse {
            topic_id: q.topic_id.clone(),
            submitted: answers.get(&q.id).cloned().unwrap_or_default(),
            correct_answer: q.correct_answer.clone(),
        })
        .collect()
}

pub fn diagnostic_score(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * correct as f64 / total as f64
}

/// Score the diagnostic, seed mastery for every response and mark the
/// diagnostic complete. Everything is written in one transaction.
pub async fn initialize(
    state: &AppState,
    user_id: &str,
    responses: &[PretestResponse],
) -> Result<f64, MasteryError> {
    let matcher = state.matcher();
    let graded: Vec<(&str, bool)> = responses
        .iter()
        .map(|r| {
            (
                r.topic_id.as_str(),
                matcher.is_correct(&r.submitted, &r.correct_answer),
            )
        })
        .collect();

    let correct = graded.iter().filter(|(_, ok)| *ok).count();
    let score = diagnostic_score(correct, responses.len());

    let mut tx = state.store().pool().begin().await?;

    match state.diagnostic_policy() {
        DiagnosticPolicy::RejectResubmission => {
            if !diagnostic::insert_first(&mut *tx, user_id, score).await? {
                tx.rollback().await?;
                tracing::warn!(user_id, "diagnostic resubmission rejected");
                return Err(MasteryError::AlreadyCompleted(user_id.to_string()));
            }
        }
        DiagnosticPolicy::AllowOverride => {
            diagnostic::upsert(&mut *tx, user_id, score).await?;
        }
    }

    for (topic_id, ok) in &graded {
        let seed = if *ok {
            PRETEST_CORRECT_PRIOR
        } else {
            PRETEST_INCORRECT_PRIOR
        };
        upsert_pretest(&mut *tx, user_id, topic_id, seed).await?;
    }

    tx.commit().await?;

    tracing::info!(
        user_id,
        responses = responses.len(),
        correct,
        score,
        "diagnostic recorded"
    );
    Ok(score)
}
