//! Read access to the shared append-only stream file
//!
//! The producer is the sole writer; every consumer reads through one of the
//! two contracts here. `StreamCursor` tracks a per-consumer byte offset for
//! incremental reads; `read_all` takes a full snapshot each call.

use crate::Result;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Incremental reader over the stream file.
///
/// The offset starts at zero and advances monotonically past the bytes
/// actually returned. Offsets are not persisted: a restarted consumer
/// re-reads the whole stream from the start.
#[derive(Debug)]
pub struct StreamCursor {
    path: PathBuf,
    offset: u64,
}

impl StreamCursor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
        }
    }

    /// Return exactly the bytes appended since the previous call.
    ///
    /// If the stream file does not exist yet, returns empty without error.
    /// A torn trailing multi-byte character (a read racing the producer's
    /// write) is left unconsumed; the next call picks it up once complete.
    pub fn read_new(&mut self) -> Result<String> {
        if !self.path.exists() {
            return Ok(String::new());
        }

        let mut file = std::fs::File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;

        let text = match String::from_utf8(buf) {
            Ok(text) => text,
            Err(err) => {
                // Consume only the valid prefix; the remainder is "new"
                // bytes on the next poll.
                let valid = err.utf8_error().valid_up_to();
                let mut bytes = err.into_bytes();
                bytes.truncate(valid);
                String::from_utf8(bytes).unwrap_or_default()
            }
        };

        self.offset += text.len() as u64;
        Ok(text)
    }

    /// Current byte offset into the stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Snapshot read of the full current stream content.
///
/// Returns an empty string if the stream file does not exist yet.
pub fn read_all(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Last modification time of the stream file, used for dead-time detection.
///
/// Returns `None` if the stream file does not exist yet.
pub fn modified_time(path: &Path) -> Result<Option<SystemTime>> {
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(std::fs::metadata(path)?.modified()?))
}
