//! Derived artifact files
//!
//! Each consumer owns exactly one artifact file. Writes are whole-file
//! replaces exposed atomically (write to a temporary file in the same
//! directory, then rename), so a concurrent reader never observes a
//! truncated intermediate state.

use crate::{Error, Result};
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// When an unchanged value is produced again, write it anyway or skip?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Rewrite only when the value differs from the last written one.
    OnChange,
    /// Rewrite on every successful derivation.
    Always,
}

impl FromStr for WritePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "on-change" => Ok(WritePolicy::OnChange),
            "always" => Ok(WritePolicy::Always),
            other => Err(Error::Config(format!(
                "invalid write policy '{}' (expected 'on-change' or 'always')",
                other
            ))),
        }
    }
}

/// Writer for a single artifact file.
///
/// Remembers the last value written during this process lifetime; the
/// previous value is not reloaded from disk on restart.
#[derive(Debug)]
pub struct ArtifactWriter {
    path: PathBuf,
    policy: WritePolicy,
    last: Option<String>,
}

impl ArtifactWriter {
    pub fn new(path: impl Into<PathBuf>, policy: WritePolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            last: None,
        }
    }

    /// Write `value` to the artifact file per the configured policy.
    ///
    /// Returns `true` if the file was rewritten, `false` if the write was
    /// suppressed as unchanged.
    pub fn write(&mut self, value: &str) -> Result<bool> {
        if self.policy == WritePolicy::OnChange && self.last.as_deref() == Some(value) {
            return Ok(false);
        }

        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
            None => tempfile::NamedTempFile::new_in(".")?,
        };
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        self.last = Some(value.to_string());
        Ok(true)
    }

    /// Last value written by this process, if any.
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_write_always_lands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentiment.txt");
        let mut writer = ArtifactWriter::new(&path, WritePolicy::OnChange);

        assert!(writer.write("POSITIVE").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "POSITIVE");
    }

    #[test]
    fn on_change_suppresses_identical_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentiment.txt");
        let mut writer = ArtifactWriter::new(&path, WritePolicy::OnChange);

        assert!(writer.write("POSITIVE").unwrap());
        assert!(!writer.write("POSITIVE").unwrap());
        assert!(writer.write("NEGATIVE").unwrap());
        assert!(writer.write("POSITIVE").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "POSITIVE");
    }

    #[test]
    fn always_rewrites_identical_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suggestions.txt");
        let mut writer = ArtifactWriter::new(&path, WritePolicy::Always);

        assert!(writer.write("{}").unwrap());
        assert!(writer.write("{}").unwrap());
    }

    #[test]
    fn overwrite_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");
        let mut writer = ArtifactWriter::new(&path, WritePolicy::OnChange);

        writer.write("a much longer first value").unwrap();
        writer.write("short").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn write_policy_parses_from_str() {
        assert_eq!(
            WritePolicy::from_str("always").unwrap(),
            WritePolicy::Always
        );
        assert_eq!(
            WritePolicy::from_str("on-change").unwrap(),
            WritePolicy::OnChange
        );
        assert!(WritePolicy::from_str("sometimes").is_err());
    }
}
