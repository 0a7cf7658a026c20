//! Whole-file JSON output for the curator.
//!
//! `users.json` and `tweets.json` carry no history: every run replaces
//! them with compact JSON arrays.

use std::path::Path;

use serde::Serialize;

use crate::error::StoreError;

/// Serialize `value` as compact JSON and overwrite the file at `path`.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if serialization fails, or
/// [`StoreError::Io`] if the file cannot be written.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec(value)?;
    std::fs::write(path, &json).map_err(|e| StoreError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "output file written");
    Ok(())
}
