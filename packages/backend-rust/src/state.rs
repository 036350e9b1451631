use std::sync::Arc;

use gebra_algo::{BktModel, BktParams};
use sqlx::SqlitePool;

use crate::curriculum::{Question, QuestionBank, TopicCatalog};
use crate::services::answer::{AnswerMatcher, NormalizedMatcher};
use crate::services::diagnostic::DiagnosticStore;
use crate::services::mastery_store::MasteryStore;
use crate::services::pretest::DiagnosticPolicy;

/// Everything a request needs, built once at startup and shared by clone.
///
/// Catalog, parameters and policy are immutable for the life of the process.
#[derive(Clone)]
pub struct AppState {
    store: MasteryStore,
    diagnostics: DiagnosticStore,
    catalog: Arc<TopicCatalog>,
    questions: Arc<QuestionBank>,
    pretest_questions: Arc<QuestionBank>,
    model: BktModel,
    matcher: Arc<dyn AnswerMatcher>,
    diagnostic_policy: DiagnosticPolicy,
}

impl AppState {
    pub fn new(pool: SqlitePool, catalog: TopicCatalog, params: BktParams) -> Self {
        Self {
            store: MasteryStore::new(pool.clone()),
            diagnostics: DiagnosticStore::new(pool),
            catalog: Arc::new(catalog),
            questions: Arc::new(QuestionBank::default()),
            pretest_questions: Arc::new(QuestionBank::default()),
            model: BktModel::new(params),
            matcher: Arc::new(NormalizedMatcher),
            diagnostic_policy: DiagnosticPolicy::default(),
        }
    }

    pub fn with_questions(mut self, questions: QuestionBank, pretest_questions: QuestionBank) -> Self {
        self.questions = Arc::new(questions);
        self.pretest_questions = Arc::new(pretest_questions);
        self
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn AnswerMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_diagnostic_policy(mut self, policy: DiagnosticPolicy) -> Self {
        self.diagnostic_policy = policy;
        self
    }

    pub fn store(&self) -> &MasteryStore {
        &self.store
    }

    pub fn diagnostics(&self) -> &DiagnosticStore {
        &self.diagnostics
    }

    pub fn catalog(&self) -> &TopicCatalog {
        &self.catalog
    }

    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    /// Diagnostic questions, falling back to the head of the practice bank.
    pub fn pretest_questions(&self) -> &[Question] {
        self.questions.pretest_set(&self.pretest_questions)
    }

    pub fn model(&self) -> &BktModel {
        &self.model
    }

    pub fn matcher(&self) -> &dyn AnswerMatcher {
        self.matcher.as_ref()
    }

    pub fn diagnostic_policy(&self) -> DiagnosticPolicy {
        self.diagnostic_policy
    }
}
