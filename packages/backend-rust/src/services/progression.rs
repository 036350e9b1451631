use gebra_algo::UNLOCK_THRESHOLD;

use crate::services::MasteryError;
use crate::state::AppState;

/// Whether `topic_id` is closed to the learner.
///
/// The first topic is always open. Any other topic opens once the mastery of
/// its immediate predecessor reaches the unlock threshold; a predecessor with
/// no record counts as the store default prior. Read-only.
pub async fn is_locked(state: &AppState, user_id: &str, topic_id: &str) -> Result<bool, MasteryError> {
    let predecessor = state
        .catalog()
        .predecessor(topic_id)
        .ok_or_else(|| MasteryError::NotFound(format!("topic {topic_id}")))?;

    let Some(prev) = predecessor else {
        return Ok(false);
    };

    let (prev_mastery, _) = state.store().get(user_id, &prev.id).await?;
    Ok(!state.model().is_mastered(prev_mastery, UNLOCK_THRESHOLD))
}

/// Same check as [`is_locked`], as an error for callers that must refuse.
pub async fn ensure_unlocked(
    state: &AppState,
    user_id: &str,
    topic_id: &str,
) -> Result<(), MasteryError> {
    if is_locked(state, user_id, topic_id).await? {
        tracing::debug!(user_id, topic_id, "access to locked topic refused");
        return Err(MasteryError::Locked(topic_id.to_string()));
    }
    Ok(())
}
