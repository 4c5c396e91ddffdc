// src/repositories/json/mod.rs
//
// File-backed stores. Each store is one JSON document owned by an external
// editor, so loads tolerate a missing file and saves replace atomically.

pub mod commands;
pub mod plaques;
pub mod secrets;

use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::Error;

/// Reads a JSON document, returning `T::default()` when the file does not
/// exist yet. Malformed JSON is an error; callers decide how to degrade.
pub(crate) fn read_json_or_default<T>(path: &Path) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Writes a JSON document through a temp file + rename in the same
/// directory, so readers never observe partial data.
pub(crate) fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), Error>
where
    T: Serialize,
{
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    let raw = serde_json::to_string_pretty(value)?;
    tmp.write_all(raw.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let value: Vec<Value> = read_json_or_default(&path).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let result: Result<Vec<Value>, Error> = read_json_or_default(&path);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let value = serde_json::json!({"a": 1});
        write_json_atomic(&path, &value).unwrap();
        let back: Value = read_json_or_default(&path).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json_atomic(&path, &serde_json::json!([1, 2, 3])).unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], "out.json");
    }
}
