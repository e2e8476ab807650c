//! Dead-time summarizer for the shared transcript stream
//!
//! Snapshots the whole document once the stream has gone quiet and keeps a
//! rolling abstractive summary artifact. A summarizer failure degrades to an
//! error description written as the summary value, never a crash.

pub mod monitor;
pub mod summarizer;

pub use monitor::SummaryMonitor;
pub use summarizer::{ChatSummarizer, Summarize, SummarizerError};
