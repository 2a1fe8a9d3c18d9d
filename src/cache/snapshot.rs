//! JSON snapshot files for the cache stores
//!
//! Each store is one JSON object mapping its key to the serialized entry.
//! Saving writes a sibling `*.tmp` file and renames it over the target, so a
//! crash mid-save leaves the previous snapshot intact.

use crate::cache::CacheError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Reads a snapshot into a map
pub fn read_snapshot<V: DeserializeOwned>(path: &Path) -> Result<HashMap<String, V>, CacheError> {
    let content = fs::read_to_string(path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| CacheError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a snapshot, falling back to an empty map if it is absent or corrupt
pub fn read_snapshot_or_empty<V: DeserializeOwned>(path: &Path) -> HashMap<String, V> {
    match read_snapshot(path) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("{} - starting with an empty cache", e);
            HashMap::new()
        }
    }
}

/// Atomically replaces the snapshot at `path` with `entries`
pub fn write_snapshot<V: Serialize>(
    path: &Path,
    entries: &BTreeMap<String, V>,
) -> Result<(), CacheError> {
    let tmp_path = temp_path(path);
    let io_err = |source| CacheError::Io {
        path: tmp_path.clone(),
        source,
    };

    let file = fs::File::create(&tmp_path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, entries).map_err(|source| CacheError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)?;
    drop(writer);

    fs::rename(&tmp_path, path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
