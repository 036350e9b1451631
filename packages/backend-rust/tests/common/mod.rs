#![allow(dead_code)]

use gebra_algo::BktParams;
use gebra_backend::curriculum::{Question, QuestionBank, Topic, TopicCatalog};
use gebra_backend::db::{init_sqlite_pool, DbSettings};
use gebra_backend::state::AppState;
use tempfile::TempDir;

pub struct TestEnv {
    pub state: AppState,
    _dir: TempDir,
}

pub async fn create_test_env(catalog: TopicCatalog) -> TestEnv {
    let dir = TempDir::new().expect("failed to create temp dir");
    let settings = DbSettings::at(dir.path().join("mastery.db"));
    let pool = init_sqlite_pool(&settings)
        .await
        .expect("failed to open sqlite pool");

    let state = AppState::new(pool, catalog, BktParams::default())
        .with_questions(practice_bank(), QuestionBank::default());

    TestEnv { state, _dir: dir }
}

pub async fn default_env() -> TestEnv {
    create_test_env(TopicCatalog::default_curriculum()).await
}

/// bab1, bab2, final exam.
pub fn small_catalog() -> TopicCatalog {
    TopicCatalog::new(vec![
        Topic::lesson("bab1", "1. Algebra"),
        Topic::lesson("bab2", "2. Manipulation"),
        Topic::exam("final_exam", "FINAL EVALUATION"),
    ])
    .expect("valid catalog")
}

pub fn question(id: i64, topic_id: &str, correct: &str, explanation: &str) -> Question {
    Question {
        id,
        topic_id: topic_id.to_string(),
        text: format!("question {id}"),
        correct_answer: correct.to_string(),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        explanation: explanation.to_string(),
    }
}

pub fn practice_bank() -> QuestionBank {
    QuestionBank::new(vec![
        question(1, "bab1", "A", "Collect like terms first."),
        question(2, "bab1", "C", "Substitute x = 2."),
        question(3, "bab2", "B", "Factorise the quadratic."),
        question(4, "final_exam", "D", "Review chapter 13."),
    ])
}
