pub mod answer;
pub mod diagnostic;
pub mod mastery_store;
pub mod practice;
pub mod pretest;
pub mod progress;
pub mod progression;

use gebra_algo::BktError;

#[derive(Debug, thiserror::Error)]
pub enum MasteryError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("topic locked: {0}")]
    Locked(String),
    #[error("diagnostic already completed for learner {0}")]
    AlreadyCompleted(String),
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

impl From<BktError> for MasteryError {
    fn from(err: BktError) -> Self {
        MasteryError::InvalidState(err.to_string())
    }
}
