//! # Convo Common Library
//!
//! Shared code for the transcript monitoring processes including:
//! - Stream cursor (incremental and snapshot reads)
//! - Artifact writer (atomic replace, change suppression)
//! - Polling scheduler and the `Deriver` trait
//! - Configuration loading
//! - Transcript timestamp parsing

pub mod artifact;
pub mod config;
pub mod error;
pub mod poll;
pub mod shutdown;
pub mod stream;
pub mod timestamp;

pub use error::{Error, Result};
