//! Artifact persistence: fitted model, fitted scaler and metrics report are
//! stored as JSON documents.

use std::fs;
use std::path::Path;

use biopsy_core::{BiopsyError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Pretty-prints `value` as JSON to `path`, creating missing parent directories.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| BiopsyError::Io(format!("{}: {e}", parent.display())))?;
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| BiopsyError::Serialization(e.to_string()))?;
    fs::write(path, json).map_err(|e| BiopsyError::Io(format!("{}: {e}", path.display())))
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .map_err(|e| BiopsyError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| BiopsyError::Serialization(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Artifact {
        name: String,
        weights: Vec<f64>,
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/artifact.json");
        let artifact = Artifact {
            name: "m".into(),
            weights: vec![0.5, -1.25],
        };

        save_json(&artifact, &path).unwrap();
        let restored: Artifact = load_json(&path).unwrap();
        assert_eq!(restored, artifact);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Artifact> = load_json(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(BiopsyError::Io(_))));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let result: Result<Artifact> = load_json(&path);
        assert!(matches!(result, Err(BiopsyError::Serialization(_))));
    }
}
