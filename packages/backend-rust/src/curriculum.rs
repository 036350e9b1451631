use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

const PRETEST_FALLBACK_SIZE: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one topic")]
    Empty,
    #[error("duplicate topic id: {0}")]
    DuplicateTopic(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_exam: bool,
}

impl Topic {
    pub fn lesson(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_exam: false,
        }
    }

    pub fn exam(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_exam: true,
        }
    }
}

/// Fixed, ordered curriculum. Order in the vector is the unlock order.
#[derive(Debug, Clone)]
pub struct TopicCatalog {
    topics: Vec<Topic>,
}

impl TopicCatalog {
    pub fn new(topics: Vec<Topic>) -> Result<Self, CatalogError> {
        if topics.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(topics.len());
        for topic in &topics {
            if !seen.insert(topic.id.as_str()) {
                return Err(CatalogError::DuplicateTopic(topic.id.clone()));
            }
        }
        Ok(Self { topics })
    }

    pub fn default_curriculum() -> Self {
        let chapters = [
            "Algebraic Representation & Formulae",
            "Algebraic Manipulation",
            "Solution of Equations & Inequalities",
            "Graphs in Practical Situations",
            "Straight-Line Graphs",
            "Graphs of Functions",
            "Number Sequence",
            "Indices",
            "Proportion",
            "Linear Programming",
            "Functions",
            "Differentiation",
            "Integration",
        ];

        let mut topics: Vec<Topic> = chapters
            .iter()
            .enumerate()
            .map(|(i, name)| Topic::lesson(format!("bab{}", i + 1), format!("{}. {name}", i + 1)))
            .collect();
        topics.push(Topic::exam("final_exam", "FINAL EVALUATION"));

        Self { topics }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let topics: Vec<Topic> = read_json(path)?;
        Self::new(topics)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn first(&self) -> Option<&Topic> {
        self.topics.first()
    }

    pub fn position(&self, topic_id: &str) -> Option<usize> {
        self.topics.iter().position(|t| t.id == topic_id)
    }

    /// `Some(None)` for the first topic, `None` for an unknown id.
    pub fn predecessor(&self, topic_id: &str) -> Option<Option<&Topic>> {
        let index = self.position(topic_id)?;
        Some(index.checked_sub(1).map(|prev| &self.topics[prev]))
    }

    pub fn ordinary(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter().filter(|t| !t.is_exam)
    }

    pub fn exam(&self) -> Option<&Topic> {
        self.topics.iter().find(|t| t.is_exam)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub topic_id: String,
    pub text: String,
    pub correct_answer: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

/// Question records handed over by the ingestion process.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let questions: Vec<Question> = read_json(path)?;
        Ok(Self::new(questions))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn find(&self, question_id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn for_topic<'a>(&'a self, topic_id: &'a str) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions.iter().filter(move |q| q.topic_id == topic_id)
    }

    /// Questions for the diagnostic: the dedicated pretest bank, or the first
    /// few practice questions when that bank is empty.
    pub fn pretest_set<'a>(&'a self, pretest_bank: &'a QuestionBank) -> &'a [Question] {
        if !pretest_bank.is_empty() {
            return pretest_bank.questions();
        }
        let end = self.questions.len().min(PRETEST_FALLBACK_SIZE);
        &self.questions[..end]
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}
