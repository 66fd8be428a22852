//! Filesystem helpers for reading/writing JSON tables.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, StorageContext};

/// Result returned after writing a table.
#[derive(Debug, Clone)]
pub struct TableWriteOutcome {
    pub hash: String,
}

/// Loads a JSON table if it exists.
pub fn read_table<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Option<T>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read(path).storage_context(|| format!("failed reading table {:?}", path))?;
    let value = serde_json::from_slice(&data)
        .storage_context(|| format!("failed parsing table {:?}", path))?;
    Ok(Some(value))
}

/// Writes a JSON table through a temporary sibling file and renames it into
/// place, returning the hash of the written bytes.
pub fn write_table<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<TableWriteOutcome> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .storage_context(|| format!("failed creating directory {:?}", parent))?;
    }
    let payload = serde_json::to_vec_pretty(value)
        .storage_context(|| format!("failed serializing table {:?}", path))?;
    let hash = compute_hash(&payload);
    let tmp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp_path)
        .storage_context(|| format!("failed opening {:?}", tmp_path))?;
    file.write_all(&payload)
        .storage_context(|| format!("failed writing {:?}", tmp_path))?;
    file.sync_all()
        .storage_context(|| format!("failed syncing {:?}", tmp_path))?;
    fs::rename(&tmp_path, path)
        .storage_context(|| format!("failed replacing table {:?}", path))?;
    Ok(TableWriteOutcome { hash })
}

/// Computes a lowercase hex SHA-256 hash of the provided bytes.
pub fn compute_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}
