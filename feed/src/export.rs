//! JSON export of the fetched feed.
//!
//! Writes the first [`EXPORT_LIMIT`] raw events, unfiltered, as a
//! pretty-printed JSON array. Field order is kept as received.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Default export file name.
pub const DEFAULT_EXPORT_PATH: &str = "activity.json";

/// Maximum number of events written.
pub const EXPORT_LIMIT: usize = 7;

/// Errors that can occur while exporting.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing the file failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes up to [`EXPORT_LIMIT`] events to `path`, replacing any existing file.
///
/// Returns the number of events written.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be written.
pub fn export_json(events: &[Value], path: &Path) -> Result<usize, ExportError> {
    let exported = &events[..events.len().min(EXPORT_LIMIT)];
    let mut contents = serde_json::to_string_pretty(exported)?;
    contents.push('\n');

    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), events = exported.len(), "Exported events");
    Ok(exported.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn writes_at_most_seven_events() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activity.json");
        let events: Vec<Value> = (0..10).map(|i| json!({"id": i.to_string()})).collect();

        let written = export_json(&events, &path).unwrap();

        assert_eq!(written, 7);
        let back: Vec<Value> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, events[..7]);
    }

    #[test]
    fn output_is_two_space_indented_and_keeps_field_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activity.json");
        let events = vec![json!({"type": "WatchEvent", "repo": {"name": "a/b"}, "id": "1"})];

        export_json(&events, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"type\": \"WatchEvent\""), "{text}");
        let type_pos = text.find("\"type\"").unwrap();
        let id_pos = text.find("\"id\"").unwrap();
        assert!(type_pos < id_pos);
    }

    #[test]
    fn empty_input_writes_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activity.json");

        assert_eq!(export_json(&[], &path).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("activity.json");

        let err = export_json(&[json!({})], &path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
