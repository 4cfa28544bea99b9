//! JSON file helpers
//!
//! Ledger documents are replaced whole on every write, so a write goes to a
//! sibling temp file first and is renamed over the target once synced.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{EnvelopeError, EnvelopeResult};

fn storage_err(action: &str, path: &Path, e: impl std::fmt::Display) -> EnvelopeError {
    EnvelopeError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

/// Read a JSON document, or `None` if the file does not exist
pub fn read_json_opt<T, P>(path: P) -> EnvelopeResult<Option<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path).map_err(|e| storage_err("open", path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|e| storage_err("parse", path, e))
}

/// Read a JSON document, falling back to `T::default()` for a missing file
pub fn read_json<T, P>(path: P) -> EnvelopeResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    Ok(read_json_opt(path)?.unwrap_or_default())
}

/// Replace a JSON document atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> EnvelopeResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_err("create directory", parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path).map_err(|e| storage_err("create", &temp_path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_err("serialize", path, e))?;
    writer
        .flush()
        .and_then(|_| writer.get_ref().sync_all())
        .map_err(|e| storage_err("flush", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_err("replace", path, e)
    })
}
