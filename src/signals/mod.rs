//! Capability interfaces for the external models the engine consults.
//!
//! Implementations are loaded once and shared across requests; they must be
//! stateless from the engine's point of view.

pub mod reference;
pub mod semantic;
pub mod timebox;

use std::sync::Arc;

use thiserror::Error;

pub use reference::{HashedBowEmbedder, LexiconSentiment, RuleGrammarChecker};
pub use semantic::SemanticSimilarityScorer;
pub use timebox::TimeBoxed;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollaboratorError {
    #[error("{0} is unavailable")]
    Unavailable(String),

    #[error("{name} timed out after {millis} ms")]
    Timeout { name: String, millis: u64 },

    #[error("{0}")]
    Failed(String),
}

pub trait GrammarChecker: Send + Sync {
    fn name(&self) -> &str;

    /// Number of issues detected in `text`.
    fn count_issues(&self, text: &str) -> Result<u32, CollaboratorError>;
}

pub trait SentimentClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Longest input, in characters, the classifier accepts.
    fn max_input_chars(&self) -> usize {
        512
    }

    /// Probability of positive affect in [0,1].
    fn positivity(&self, text: &str) -> Result<f64, CollaboratorError>;
}

pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError>;
}

/// Stand-in for a collaborator that is switched off or failed to load.
#[derive(Debug, Clone)]
pub struct Unavailable {
    name: String,
}

impl Unavailable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn error(&self) -> CollaboratorError {
        CollaboratorError::Unavailable(self.name.clone())
    }
}

impl GrammarChecker for Unavailable {
    fn name(&self) -> &str {
        &self.name
    }

    fn count_issues(&self, _text: &str) -> Result<u32, CollaboratorError> {
        Err(self.error())
    }
}

impl SentimentClassifier for Unavailable {
    fn name(&self) -> &str {
        &self.name
    }

    fn positivity(&self, _text: &str) -> Result<f64, CollaboratorError> {
        Err(self.error())
    }
}

impl Embedder for Unavailable {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, CollaboratorError> {
        Err(self.error())
    }
}

#[derive(Clone)]
pub struct Collaborators {
    pub grammar: Arc<dyn GrammarChecker>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub embedder: Arc<dyn Embedder>,
}

impl Collaborators {
    /// Deterministic in-process models; no external services.
    pub fn reference() -> Self {
        Self {
            grammar: Arc::new(RuleGrammarChecker),
            sentiment: Arc::new(LexiconSentiment),
            embedder: Arc::new(HashedBowEmbedder::default()),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("grammar", &self.grammar.name())
            .field("sentiment", &self.sentiment.name())
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/signals/tests.rs"]
mod tests;
