//! Lexical polarity scoring

use std::fmt;

/// Coarse polarity label derived from a scorer result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Map a polarity score in [-1, 1]: non-negative scores are positive.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.0 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    /// Artifact file representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polarity scorer over a chunk of text.
pub trait Scorer {
    /// Polarity in [-1, 1].
    fn score(&self, text: &str) -> f64;
}

/// VADER lexicon scorer; uses the compound score as overall polarity.
pub struct LexiconScorer {
    analyzer: vader_sentiment::SentimentIntensityAnalyzer<'static>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            analyzer: vader_sentiment::SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let scores = self.analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0)
    }
}
