//! Product suggestion monitor for the shared transcript stream
//!
//! Combines a static client profile, a static product catalog and the live
//! transcript, asking an external reasoning oracle for up to three ranked
//! product suggestions per cycle.

pub mod monitor;
pub mod oracle;

pub use monitor::SuggestionMonitor;
pub use oracle::{
    ChatOracle, OracleError, ProductSuggestion, SuggestOracle, SuggestionOutcome, SuggestionSet,
    MAX_SUGGESTIONS,
};
