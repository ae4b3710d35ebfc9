use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{AdvisoryRecord, AdvisoryState};

/// Current on-disk schema version.
pub const STATE_VERSION: u32 = 1;

/// Where the previous cycle's [`AdvisoryState`] lives between runs.
pub trait StateStore {
    /// Never fails: a missing or unusable store reads as an empty state.
    fn read_state(&self) -> AdvisoryState;
    fn write_state(&self, state: &AdvisoryState) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StateDocument {
    version: u32,
    saved_at: DateTime<Utc>,
    #[serde(default)]
    advisories: Vec<AdvisoryRecord>,
}

/// JSON file store. Writes go through a sibling temp file and a rename.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn read_state(&self) -> AdvisoryState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no previous state");
                return AdvisoryState::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "state unreadable; starting empty");
                return AdvisoryState::new();
            }
        };

        match serde_json::from_str::<StateDocument>(&content) {
            Ok(doc) if doc.version == STATE_VERSION => {
                debug!(saved_at = %doc.saved_at, count = doc.advisories.len(), "loaded state");
                doc.advisories.into_iter().collect()
            }
            Ok(doc) => {
                warn!(version = doc.version, "unsupported state version; starting empty");
                AdvisoryState::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt state; starting empty");
                AdvisoryState::new()
            }
        }
    }

    fn write_state(&self, state: &AdvisoryState) -> Result<()> {
        let doc = StateDocument {
            version: STATE_VERSION,
            saved_at: Utc::now(),
            advisories: state.records().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&doc)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;

        debug!(path = %self.path.display(), count = state.len(), "saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(area: &str, kind: &str) -> AdvisoryRecord {
        AdvisoryRecord {
            area: area.into(),
            kind: kind.into(),
            level: "주의보".into(),
            announce_time: "10/17 10:00".into(),
            effective_time: "10/17 12:00".into(),
            clear_notice: "".into(),
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));
        let state: AdvisoryState =
            vec![record("보령시", "풍랑"), record("보령시, 태안군", "강풍")]
                .into_iter()
                .collect();

        store.write_state(&state).unwrap();
        assert_eq!(store.read_state(), state);
    }

    #[test]
    fn test_round_trip_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));

        store.write_state(&AdvisoryState::new()).unwrap();
        assert!(store.path().exists());
        assert!(store.read_state().is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("absent.json"));
        assert!(store.read_state().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "보령시_10:00/태안군_11:00").unwrap();
        assert!(FileStateStore::new(&path).read_state().is_empty());
    }

    #[test]
    fn test_unknown_version_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"version": 99, "saved_at": "2026-10-17T00:00:00Z", "advisories": []}"#,
        )
        .unwrap();
        assert!(FileStateStore::new(&path).read_state().is_empty());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("nested").join("state.json"));
        store.write_state(&AdvisoryState::new()).unwrap();
        assert!(store.path().exists());
        assert!(!dir.path().join("nested").join("state.json.tmp").exists());
    }

    #[test]
    fn test_document_uses_type_field_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));
        let state: AdvisoryState = vec![record("보령시", "풍랑")].into_iter().collect();
        store.write_state(&state).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["advisories"][0]["type"], "풍랑");
    }
}
