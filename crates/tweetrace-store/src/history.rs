//! The `stats.json` history document.
//!
//! The file is never created here: it must already exist and parse as
//! `{ "stats": [...] }`. Each append reads the whole document, pushes one
//! snapshot, and rewrites the file in place with 4-space indentation.
//! Earlier entries are written back exactly as they were read.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tweetrace_types::{StatsHistory, StatsSnapshot};

use crate::error::StoreError;

/// Handle to a history file on disk.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    /// Create a handle for the history file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the current history without modifying it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read, or
    /// [`StoreError::MalformedHistory`] if it does not parse.
    pub fn load(&self) -> Result<StatsHistory, StoreError> {
        let mut file = File::open(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        self.read_history(&mut file)
    }

    /// Append `snapshot` and rewrite the file.
    ///
    /// Returns the history as written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file is missing or cannot be
    /// rewritten, or [`StoreError::MalformedHistory`] if the existing
    /// content is not a history document.
    pub fn append(&self, snapshot: StatsSnapshot) -> Result<StatsHistory, StoreError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        let mut history = self.read_history(&mut file)?;
        history.append(snapshot)?;

        let bytes = to_pretty_json(&history)?;
        rewrite(&mut file, &bytes).map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            entries = history.len(),
            "history file rewritten"
        );
        Ok(history)
    }

    fn read_history(&self, file: &mut File) -> Result<StatsHistory, StoreError> {
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| StoreError::io(&self.path, e))?;

        serde_json::from_str(&contents).map_err(|source| StoreError::MalformedHistory {
            path: self.path.clone(),
            source,
        })
    }
}

/// Replace the whole content of `file` with `bytes`.
fn rewrite(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(0))?;
    file.write_all(bytes)?;
    file.set_len(u64::try_from(bytes.len()).unwrap_or(u64::MAX))?;
    file.flush()
}

/// Serialize `value` as JSON indented by four spaces.
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn pretty_json_uses_four_space_indent() {
        let value = serde_json::json!({"stats": [1]});
        let text = String::from_utf8(to_pretty_json(&value).unwrap()).unwrap();
        assert_eq!(text, "{\n    \"stats\": [\n        1\n    ]\n}");
    }
}
