pub mod config;
pub mod curriculum;
pub mod db;
pub mod logging;
pub mod services;
pub mod state;

use crate::config::Config;
use crate::curriculum::{QuestionBank, TopicCatalog};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Db(#[from] db::DbInitError),
    #[error(transparent)]
    Catalog(#[from] curriculum::CatalogError),
}

/// Open the store and load the curriculum described by `config`.
pub async fn create_state(config: &Config) -> Result<AppState, InitError> {
    let pool = db::init_sqlite_pool(&config.db).await?;

    let catalog = match &config.curriculum_path {
        Some(path) => TopicCatalog::from_json_file(path)?,
        None => TopicCatalog::default_curriculum(),
    };
    let questions = load_bank(config.question_bank_path.as_deref())?;
    let pretest = load_bank(config.pretest_bank_path.as_deref())?;

    tracing::info!(
        topics = catalog.len(),
        questions = questions.len(),
        pretest_questions = pretest.len(),
        policy = ?config.diagnostic_policy,
        "curriculum loaded"
    );

    Ok(AppState::new(pool, catalog, config.bkt)
        .with_questions(questions, pretest)
        .with_diagnostic_policy(config.diagnostic_policy))
}

fn load_bank(path: Option<&std::path::Path>) -> Result<QuestionBank, curriculum::CatalogError> {
    match path {
        Some(path) => QuestionBank::from_json_file(path),
        None => Ok(QuestionBank::default()),
    }
}
