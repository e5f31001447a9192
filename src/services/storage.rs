//! Flat JSON blob persistence with swallowed errors
//!
//! Read failures degrade to the caller's default and write failures leave the
//! in-memory state authoritative; neither is allowed to disturb the timer.

use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

/// Read and parse a JSON file, falling back to `default` on any failure
pub fn read_json<T: DeserializeOwned>(path: &Path, default: T) -> T {
    if !path.exists() {
        return default;
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse {}: {}", path.display(), e);
                default
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            default
        }
    }
}

/// Serialize a value to a JSON file, logging on failure
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> bool {
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize {}: {}", path.display(), e);
            return false;
        }
    };

    match fs::write(path, json) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to write {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let value: Vec<u64> = read_json(&dir.path().join("absent.json"), vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn corrupt_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        let value: Vec<u64> = read_json(&path, Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value.json");
        assert!(write_json(&path, &vec![1u64, 2, 3]));
        let value: Vec<u64> = read_json(&path, Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }
}
