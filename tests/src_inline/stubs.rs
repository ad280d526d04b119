//! Deterministic collaborator stubs shared by the inline tests.

use std::sync::{Arc, Mutex};

use crate::signals::{
    CollaboratorError, Collaborators, Embedder, GrammarChecker, SentimentClassifier, Unavailable,
};

pub struct FixedGrammar(pub u32);

impl GrammarChecker for FixedGrammar {
    fn name(&self) -> &str {
        "fixed-grammar"
    }

    fn count_issues(&self, _text: &str) -> Result<u32, CollaboratorError> {
        Ok(self.0)
    }
}

pub struct FixedSentiment {
    pub value: f64,
    pub max_chars: usize,
    pub seen_chars: Mutex<Option<usize>>,
}

impl FixedSentiment {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            max_chars: 512,
            seen_chars: Mutex::new(None),
        }
    }
}

impl SentimentClassifier for FixedSentiment {
    fn name(&self) -> &str {
        "fixed-sentiment"
    }

    fn max_input_chars(&self) -> usize {
        self.max_chars
    }

    fn positivity(&self, text: &str) -> Result<f64, CollaboratorError> {
        *self.seen_chars.lock().unwrap() = Some(text.chars().count());
        Ok(self.value)
    }
}

/// Two-dimensional embedding keyed on whether the text mentions `topic`.
pub struct TopicEmbedder {
    pub topic: &'static str,
}

impl Embedder for TopicEmbedder {
    fn name(&self) -> &str {
        "topic-embedder"
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        if text.to_lowercase().contains(self.topic) {
            Ok(vec![1.0, 0.0])
        } else {
            Ok(vec![0.0, 1.0])
        }
    }
}

pub struct SlowGrammar(pub std::time::Duration);

impl GrammarChecker for SlowGrammar {
    fn name(&self) -> &str {
        "slow-grammar"
    }

    fn count_issues(&self, _text: &str) -> Result<u32, CollaboratorError> {
        std::thread::sleep(self.0);
        Ok(1)
    }
}

pub fn stub_collaborators(grammar_errors: u32, sentiment: f64) -> Collaborators {
    Collaborators {
        grammar: Arc::new(FixedGrammar(grammar_errors)),
        sentiment: Arc::new(FixedSentiment::new(sentiment)),
        embedder: Arc::new(TopicEmbedder { topic: "school" }),
    }
}

pub fn offline_collaborators() -> Collaborators {
    Collaborators {
        grammar: Arc::new(Unavailable::new("grammar checker")),
        sentiment: Arc::new(Unavailable::new("sentiment classifier")),
        embedder: Arc::new(Unavailable::new("embedder")),
    }
}
