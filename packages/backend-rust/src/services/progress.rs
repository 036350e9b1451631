use std::collections::HashMap;

use gebra_algo::sanitize::round1;
use serde::Serialize;

use crate::services::progression::is_locked;
use crate::services::MasteryError;
use crate::state::AppState;

pub const GRADUATION_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub diagnostic_score: f64,
    pub average_progress: f64,
    pub exam_score: f64,
    pub graduated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonEntry {
    pub id: String,
    pub name: String,
    pub percent: u32,
    pub is_locked: bool,
    pub is_exam: bool,
}

/// Report-card view of a learner.
///
/// A topic without a record counts as zero progress here, not as the store's
/// default prior.
pub async fn summarize(state: &AppState, user_id: &str) -> Result<ProgressSummary, MasteryError> {
    let diagnostic_score = state
        .diagnostics()
        .get(user_id)
        .await?
        .map(|d| round1(d.score))
        .unwrap_or(0.0);

    let recorded = recorded_mastery(state, user_id).await?;
    let mastery_of = |topic_id: &str| recorded.get(topic_id).copied().unwrap_or(0.0);

    let ordinary: Vec<f64> = state
        .catalog()
        .ordinary()
        .map(|t| mastery_of(&t.id))
        .collect();

    let average_progress = if ordinary.is_empty() {
        0.0
    } else {
        round1(100.0 * ordinary.iter().sum::<f64>() / ordinary.len() as f64)
    };

    let exam_score = state
        .catalog()
        .exam()
        .map(|exam| round1(100.0 * mastery_of(&exam.id)))
        .unwrap_or(0.0);

    let graduated = average_progress >= GRADUATION_THRESHOLD && exam_score >= GRADUATION_THRESHOLD;

    Ok(ProgressSummary {
        diagnostic_score,
        average_progress,
        exam_score,
        graduated,
    })
}

/// Every topic in curriculum order with its displayed percentage and lock
/// state.
pub async fn lesson_overview(state: &AppState, user_id: &str) -> Result<Vec<LessonEntry>, MasteryError> {
    let recorded = recorded_mastery(state, user_id).await?;

    let mut entries = Vec::with_capacity(state.catalog().len());
    for topic in state.catalog().topics() {
        let mastery = recorded.get(topic.id.as_str()).copied().unwrap_or(0.0);
        entries.push(LessonEntry {
            id: topic.id.clone(),
            name: topic.name.clone(),
            percent: (mastery * 100.0).round() as u32,
            is_locked: is_locked(state, user_id, &topic.id).await?,
            is_exam: topic.is_exam,
        });
    }
    Ok(entries)
}

async fn recorded_mastery(state: &AppState, user_id: &str) -> Result<HashMap<String, f64>, MasteryError> {
    Ok(state
        .store()
        .list_for_learner(user_id)
        .await?
        .into_iter()
        .map(|r| (r.topic_id, r.p_l))
        .collect())
}
