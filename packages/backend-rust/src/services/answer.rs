use std::fmt::Debug;

/// Decides whether a submitted answer matches the canonical one.
pub trait AnswerMatcher: Debug + Send + Sync {
    fn is_correct(&self, submitted: &str, expected: &str) -> bool;
}

/// Trimmed, case-insensitive string equality.
///
/// A blank submission is always incorrect, even against a blank key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedMatcher;

impl AnswerMatcher for NormalizedMatcher {
    fn is_correct(&self, submitted: &str, expected: &str) -> bool {
        let submitted = normalize(submitted);
        !submitted.is_empty() && submitted == normalize(expected)
    }
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}
