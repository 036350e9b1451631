use serde::Serialize;

use crate::services::progression::ensure_unlocked;
use crate::services::MasteryError;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeOutcome {
    pub question_id: i64,
    pub correct: bool,
    pub prior: f64,
    pub posterior: f64,
    pub is_read: bool,
    /// Only filled for incorrect answers.
    pub explanation: Option<String>,
}

/// Grade one practice answer and fold it into the learner's mastery.
///
/// Refuses locked topics before anything is read. The posterior is computed
/// before any write, so a failed update leaves the stored prior untouched.
pub async fn record_attempt(
    state: &AppState,
    user_id: &str,
    topic_id: &str,
    question_id: i64,
    submitted: &str,
) -> Result<PracticeOutcome, MasteryError> {
    ensure_unlocked(state, user_id, topic_id).await?;

    let question = state
        .questions()
        .for_topic(topic_id)
        .find(|q| q.id == question_id)
        .ok_or_else(|| MasteryError::NotFound(format!("question {question_id} in topic {topic_id}")))?;

    let correct = state.matcher().is_correct(submitted, &question.correct_answer);

    let (prior, is_read) = state.store().get(user_id, topic_id).await?;
    let transition = state.model().observe(prior, correct)?;
    state
        .store()
        .set_mastery(user_id, topic_id, transition.posterior)
        .await?;

    tracing::info!(
        user_id,
        topic_id,
        question_id,
        correct,
        prior,
        posterior = transition.posterior,
        delta = transition.delta(),
        "practice attempt recorded"
    );

    Ok(PracticeOutcome {
        question_id,
        correct,
        prior,
        posterior: transition.posterior,
        is_read,
        explanation: (!correct).then(|| question.explanation.clone()),
    })
}
