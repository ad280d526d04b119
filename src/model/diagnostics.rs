use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Grammar,
    Sentiment,
    Similarity,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Grammar => "grammar",
            Signal::Sentiment => "sentiment",
            Signal::Similarity => "similarity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Degradation {
    pub signal: Signal,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackNote {
    pub criterion: String,
    pub reason: String,
}

/// Side channel for one evaluation. Never part of the response contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub duration_estimated: bool,
    pub sentiment_truncated: bool,
    pub degraded: Vec<Degradation>,
    pub fallbacks: Vec<FallbackNote>,
}

impl Diagnostics {
    pub fn record_degraded(&mut self, signal: Signal, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(signal = signal.as_str(), %reason, "signal degraded");
        self.degraded.push(Degradation { signal, reason });
    }

    pub fn record_fallback(&mut self, criterion: &str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(criterion, %reason, "semantic similarity fallback");
        self.fallbacks.push(FallbackNote {
            criterion: criterion.to_string(),
            reason,
        });
    }

    pub fn is_degraded(&self, signal: Signal) -> bool {
        self.degraded.iter().any(|d| d.signal == signal)
    }

    pub fn is_clean(&self) -> bool {
        self.degraded.is_empty() && self.fallbacks.is_empty() && !self.sentiment_truncated
    }
}
