//! Sentiment monitor for the shared transcript stream
//!
//! Incrementally reads new stream content each poll, scores its polarity
//! with a lexicon scorer and maintains a `POSITIVE`/`NEGATIVE` artifact
//! file, rewritten only when the label changes.

pub mod monitor;
pub mod scorer;

pub use monitor::SentimentMonitor;
pub use scorer::{LexiconScorer, Scorer, Sentiment};
