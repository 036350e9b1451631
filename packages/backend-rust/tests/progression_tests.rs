mod common;

use gebra_backend::services::practice::record_attempt;
use gebra_backend::services::progression::{ensure_unlocked, is_locked};
use gebra_backend::services::MasteryError;

use common::{create_test_env, default_env, small_catalog};

#[tokio::test]
async fn test_first_topic_is_never_locked() {
    let env = default_env().await;
    assert!(!is_locked(&env.state, "alice", "bab1").await.unwrap());

    env.state.store().set_mastery("alice", "bab1", 0.0).await.unwrap();
    assert!(!is_locked(&env.state, "alice", "bab1").await.unwrap());
}

#[tokio::test]
async fn test_missing_predecessor_record_locks() {
    let env = default_env().await;
    assert!(is_locked(&env.state, "alice", "bab2").await.unwrap());
    assert!(is_locked(&env.state, "alice", "bab13").await.unwrap());
}

#[tokio::test]
async fn test_threshold_is_inclusive_at_ninety_percent() {
    let env = default_env().await;
    let store = env.state.store();

    store.set_mastery("alice", "bab1", 0.8999).await.unwrap();
    assert!(is_locked(&env.state, "alice", "bab2").await.unwrap());

    store.set_mastery("alice", "bab1", 0.90).await.unwrap();
    assert!(!is_locked(&env.state, "alice", "bab2").await.unwrap());
}

#[tokio::test]
async fn test_only_immediate_predecessor_matters() {
    let env = default_env().await;
    let store = env.state.store();

    store.set_mastery("alice", "bab1", 0.1).await.unwrap();
    store.set_mastery("alice", "bab2", 0.95).await.unwrap();

    assert!(is_locked(&env.state, "alice", "bab2").await.unwrap());
    assert!(!is_locked(&env.state, "alice", "bab3").await.unwrap());
}

#[tokio::test]
async fn test_exam_follows_the_same_rule() {
    let env = create_test_env(small_catalog()).await;
    assert!(is_locked(&env.state, "alice", "final_exam").await.unwrap());

    env.state.store().set_mastery("alice", "bab2", 0.93).await.unwrap();
    assert!(!is_locked(&env.state, "alice", "final_exam").await.unwrap());
}

#[tokio::test]
async fn test_unknown_topic_is_not_found() {
    let env = default_env().await;
    let err = is_locked(&env.state, "alice", "bab99").await.unwrap_err();
    assert!(matches!(err, MasteryError::NotFound(_)));
}

#[tokio::test]
async fn test_gate_does_not_write() {
    let env = default_env().await;
    for topic in ["bab1", "bab2", "bab7", "final_exam"] {
        is_locked(&env.state, "alice", topic).await.unwrap();
    }
    assert!(env.state.store().list_for_learner("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ensure_unlocked_reports_locked() {
    let env = default_env().await;
    assert!(ensure_unlocked(&env.state, "alice", "bab1").await.is_ok());
    let err = ensure_unlocked(&env.state, "alice", "bab2").await.unwrap_err();
    assert!(matches!(err, MasteryError::Locked(topic) if topic == "bab2"));
}

#[tokio::test]
async fn test_correct_practice_answer_raises_mastery() {
    let env = default_env().await;
    let expected = env.state.model().update(0.5, true).unwrap();

    let outcome = record_attempt(&env.state, "alice", "bab1", 1, "  a ").await.unwrap();
    assert!(outcome.correct);
    assert_eq!(outcome.prior, 0.5);
    assert_eq!(outcome.posterior, expected);
    assert_eq!(outcome.explanation, None);

    let (p_l, _) = env.state.store().get("alice", "bab1").await.unwrap();
    assert_eq!(p_l, expected);
}

#[tokio::test]
async fn test_incorrect_practice_answer_returns_explanation() {
    let env = default_env().await;
    env.state.store().set_mastery("alice", "bab1", 0.6).await.unwrap();

    let outcome = record_attempt(&env.state, "alice", "bab1", 2, "B").await.unwrap();
    assert!(!outcome.correct);
    assert_eq!(outcome.prior, 0.6);
    assert!(outcome.posterior < 0.6);
    assert_eq!(outcome.explanation.as_deref(), Some("Substitute x = 2."));
}

#[tokio::test]
async fn test_practice_preserves_read_flag() {
    let env = default_env().await;
    env.state.store().mark_read("alice", "bab1").await.unwrap();

    let outcome = record_attempt(&env.state, "alice", "bab1", 1, "A").await.unwrap();
    assert!(outcome.is_read);
    assert!(env.state.store().get("alice", "bab1").await.unwrap().1);
}

#[tokio::test]
async fn test_practice_on_locked_topic_is_refused_without_writes() {
    let env = default_env().await;

    let err = record_attempt(&env.state, "alice", "bab2", 3, "B").await.unwrap_err();
    assert!(matches!(err, MasteryError::Locked(_)));
    assert!(env.state.store().find("alice", "bab2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_practice_rejects_question_from_other_topic() {
    let env = default_env().await;

    let err = record_attempt(&env.state, "alice", "bab1", 3, "B").await.unwrap_err();
    assert!(matches!(err, MasteryError::NotFound(_)));
    let err = record_attempt(&env.state, "alice", "bab1", 404, "B").await.unwrap_err();
    assert!(matches!(err, MasteryError::NotFound(_)));
}

#[tokio::test]
async fn test_failed_update_leaves_prior_intact() {
    let env = default_env().await;
    let pool = env.state.store().pool();

    sqlx::query(
        r#"INSERT INTO "mastery" ("userId", "topicId", "pL", "isRead", "updatedAt") VALUES ('alice', 'bab1', 1.2, 0, 'before')"#,
    )
    .execute(pool)
    .await
    .unwrap();

    let err = record_attempt(&env.state, "alice", "bab1", 1, "A").await.unwrap_err();
    assert!(matches!(err, MasteryError::InvalidState(_)));

    let (p_l, updated_at): (f64, String) =
        sqlx::query_as(r#"SELECT "pL", "updatedAt" FROM "mastery" WHERE "userId" = 'alice' AND "topicId" = 'bab1'"#)
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(p_l, 1.2);
    assert_eq!(updated_at, "before");
}

#[tokio::test]
async fn test_repeated_practice_unlocks_next_topic() {
    let env = default_env().await;

    let mut attempts = 0;
    while is_locked(&env.state, "alice", "bab2").await.unwrap() {
        record_attempt(&env.state, "alice", "bab1", 1, "A").await.unwrap();
        attempts += 1;
        assert!(attempts < 10, "bab2 never unlocked");
    }

    let outcome = record_attempt(&env.state, "alice", "bab2", 3, "b").await.unwrap();
    assert!(outcome.correct);
}
