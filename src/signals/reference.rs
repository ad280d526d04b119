//! Deterministic in-process collaborators. They stand in for the grammar,
//! sentiment and embedding models when none are wired in, and keep the
//! engine runnable offline.

use crate::pipeline::stage1_lexical::{normalize_token, tokenize};
use crate::signals::{CollaboratorError, Embedder, GrammarChecker, SentimentClassifier};

/// Counts a small set of mechanical issues: doubled words, lowercase
/// sentence starts, lowercase pronoun `i`, `a`/`an` agreement and a missing
/// final punctuation mark.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleGrammarChecker;

const AN_EXCEPTIONS: &[&str] = &["hour", "honest", "honor", "honour", "heir"];
const A_EXCEPTIONS: &[&str] = &["uni", "use", "usu", "one", "once", "eu", "ewe"];

impl GrammarChecker for RuleGrammarChecker {
    fn name(&self) -> &str {
        "rule-grammar"
    }

    fn count_issues(&self, text: &str) -> Result<u32, CollaboratorError> {
        let tokens = tokenize(text);
        let words: Vec<String> = tokens.iter().map(|t| normalize_token(t)).collect();
        let mut issues = 0u32;

        for pair in words.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev == next && prev.chars().any(|c| c.is_alphabetic()) {
                issues += 1;
            }
            if prev == "a" && starts_with_vowel(next) && !has_prefix(next, A_EXCEPTIONS) {
                issues += 1;
            }
            if prev == "an"
                && !starts_with_vowel(next)
                && next.chars().next().is_some_and(|c| c.is_alphabetic())
                && !has_prefix(next, AN_EXCEPTIONS)
            {
                issues += 1;
            }
        }

        for token in &tokens {
            let bare = token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'');
            if bare == "i" || bare.starts_with("i'") {
                issues += 1;
            }
        }

        for sentence in text.split(['.', '!', '?']) {
            if let Some(first) = sentence.chars().find(|c| c.is_alphabetic()) {
                if first.is_lowercase() {
                    issues += 1;
                }
            }
        }

        if let Some(last) = text.trim_end().chars().last() {
            if !matches!(last, '.' | '!' | '?' | '"' | '\'' | ')') {
                issues += 1;
            }
        }

        Ok(issues)
    }
}

fn starts_with_vowel(word: &str) -> bool {
    matches!(word.chars().next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

fn has_prefix(word: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| word.starts_with(p))
}

/// Lexicon classifier with one-word negation and add-one smoothing, so an
/// affect-free text scores 0.5.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentiment;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "happy", "glad", "excited", "love", "enjoy", "enjoyed",
    "wonderful", "amazing", "delighted", "pleased", "proud", "passionate", "fun", "favourite",
    "favorite", "best", "kind", "thank", "thanks", "grateful", "confident", "like", "nice",
    "interesting", "inspired", "positive", "success", "successful",
];
const NEGATIVE_WORDS: &[&str] = &[
    "bad", "sad", "hate", "angry", "terrible", "awful", "boring", "worst", "afraid", "scared",
    "nervous", "upset", "difficult", "hard", "problem", "fail", "failed", "poor", "unhappy",
    "tired", "worried", "negative", "annoying",
];
const NEGATORS: &[&str] = &["not", "no", "never", "don't", "dont", "didn't", "isn't", "wasn't"];

impl SentimentClassifier for LexiconSentiment {
    fn name(&self) -> &str {
        "lexicon-sentiment"
    }

    fn positivity(&self, text: &str) -> Result<f64, CollaboratorError> {
        let mut positive = 0u32;
        let mut negative = 0u32;
        let mut negate = false;
        for token in tokenize(text) {
            let word = normalize_token(token);
            if NEGATORS.contains(&word.as_str()) {
                negate = true;
                continue;
            }
            let polarity = if POSITIVE_WORDS.contains(&word.as_str()) {
                Some(true)
            } else if NEGATIVE_WORDS.contains(&word.as_str()) {
                Some(false)
            } else {
                None
            };
            match (polarity, negate) {
                (Some(true), false) | (Some(false), true) => positive += 1,
                (Some(false), false) | (Some(true), true) => negative += 1,
                (None, _) => {}
            }
            negate = false;
        }
        Ok((positive as f64 + 1.0) / ((positive + negative) as f64 + 2.0))
    }
}

/// Hashed bag-of-words vectors (FNV-1a into a fixed number of buckets),
/// stop words removed.
#[derive(Debug, Clone, Copy)]
pub struct HashedBowEmbedder {
    dims: usize,
}

impl HashedBowEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }
}

impl Default for HashedBowEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "of", "to", "in", "on", "at", "for", "with", "is",
    "am", "are", "was", "were", "be", "it", "this", "that", "my", "i", "me", "we", "you",
];

impl Embedder for HashedBowEmbedder {
    fn name(&self) -> &str {
        "hashed-bow"
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        let mut v = vec![0f32; self.dims];
        for token in tokenize(text) {
            let word = normalize_token(token);
            if word.is_empty() || STOP_WORDS.contains(&word.as_str()) {
                continue;
            }
            let bucket = (fnv1a(word.as_bytes()) % self.dims as u64) as usize;
            v[bucket] += 1.0;
        }
        Ok(v)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
