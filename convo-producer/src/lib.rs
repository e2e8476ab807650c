//! Transcript replay into the shared stream file

pub mod replay;

pub use replay::{replay, ReplayConfig};
