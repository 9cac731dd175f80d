use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Read a JSON document, treating a missing, unreadable or malformed file as absent.
pub fn read_json(path: &Path) -> Option<Value> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read file, ignoring it");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "malformed JSON, ignoring file");
            None
        }
    }
}

/// Write `payload` as indented JSON with a trailing newline, creating the
/// parent directory when needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, payload: &T) -> Result<(), StoreError> {
    let mut text = serde_json::to_string_pretty(payload).map_err(|source| {
        StoreError::Serialize {
            path: path.display().to_string(),
            source,
        }
    })?;
    text.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Write {
            path: parent.display().to_string(),
            source,
        })?;
    }

    fs::write(path, text).map_err(|source| StoreError::Write {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::{read_json, write_json};

    #[test]
    fn writes_indented_json_with_trailing_newline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("out.json");
        write_json(&path, &json!({"users": []})).expect("write");

        let raw = fs::read_to_string(&path).expect("read back");
        assert_eq!(raw, "{\n  \"users\": []\n}\n");
    }

    #[test]
    fn non_ascii_text_is_written_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.json");
        write_json(&path, &json!({"name": "Zürich"})).expect("write");
        assert!(fs::read_to_string(&path).expect("read").contains("Zürich"));
    }

    #[test]
    fn missing_and_malformed_files_read_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(read_json(&dir.path().join("nope.json")).is_none());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{not json").expect("write");
        assert!(read_json(&broken).is_none());
    }
}
