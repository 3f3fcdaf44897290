//! Tier file persistence.
//!
//! Each tier is one pretty-printed JSON array under the store root
//! (`recent.json`, `hot.json`, `archive.json`). A tier is always read and
//! written as a whole; there is no per-entry update at this layer.
//!
//! Reads fail soft: a missing or undecodable file is an empty tier. Writes go
//! to a temporary file in the same directory which is then renamed over the
//! target, so a concurrent reader never observes a torn file. Two concurrent
//! writers of the same tier still race, and the last rename wins.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{Entry, Tier};

/// File-backed storage for the three tier collections.
#[derive(Debug, Clone)]
pub struct EntryStore {
    root: PathBuf,
}

impl EntryStore {
    /// Create a store rooted at `root`. Nothing is created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the tier files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the backing file for `tier`
    pub fn tier_path(&self, tier: Tier) -> PathBuf {
        self.root.join(tier.file_name())
    }

    /// Load a tier, treating a missing or unreadable file as empty.
    pub fn load(&self, tier: Tier) -> Vec<Entry> {
        match self.try_load(tier) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(tier = %tier, error = %e, "Tier unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Load a tier, reporting undecodable files instead of hiding them.
    ///
    /// A missing file is still `Ok(vec![])`. Individual records that fail to
    /// decode (for example, no `id`) are skipped with a warning.
    pub fn try_load(&self, tier: Tier) -> Result<Vec<Entry>> {
        let path = self.tier_path(tier);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::StorageUnreadable {
                    path,
                    message: e.to_string(),
                });
            }
        };

        let records: Vec<serde_json::Value> =
            serde_json::from_str(&content).map_err(|e| Error::StorageUnreadable {
                path: path.clone(),
                message: e.to_string(),
            })?;

        let mut entries = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Entry>(record) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!(tier = %tier, index, error = %e, "Skipping malformed learning record");
                }
            }
        }
        Ok(entries)
    }

    /// Replace the full contents of a tier.
    pub fn save(&self, tier: Tier, entries: &[Entry]) -> Result<()> {
        let path = self.tier_path(tier);
        write_json_atomic(&path, entries)?;
        debug!(tier = %tier, count = entries.len(), path = ?path, "Saved tier");
        Ok(())
    }
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// Creates the parent directory when absent.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| Error::unwritable(&dir, e))?;

    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| Error::unwritable(&dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Error::unwritable(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| Error::unwritable(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn entry(id: &str) -> Entry {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Entry::new(id, format!("content {id}"), "ctx", vec![], Source::Auto, &created)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path().join("learnings"));
        assert!(store.load(Tier::Recent).is_empty());
        assert!(store.try_load(Tier::Hot).unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_directory_and_roundtrips() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path().join("nested").join("learnings"));

        let entries = vec![entry("b"), entry("a")];
        store.save(Tier::Hot, &entries).unwrap();

        assert!(store.tier_path(Tier::Hot).exists());
        assert_eq!(store.load(Tier::Hot), entries);
        assert!(store.load(Tier::Recent).is_empty());
    }

    #[test]
    fn test_save_replaces_whole_tier() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path());

        store.save(Tier::Recent, &[entry("a"), entry("b")]).unwrap();
        store.save(Tier::Recent, &[entry("c")]).unwrap();

        let ids: Vec<String> = store.load(Tier::Recent).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path());
        fs::write(store.tier_path(Tier::Archive), "{ not json").unwrap();

        assert!(store.load(Tier::Archive).is_empty());
        assert!(matches!(
            store.try_load(Tier::Archive),
            Err(Error::StorageUnreadable { .. })
        ));
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path());
        fs::write(
            store.tier_path(Tier::Recent),
            r#"[{"id": "ok", "content": "fine"}, {"content": "no id"}, {"id": "neg", "use_count": -1}]"#,
        )
        .unwrap();

        let ids: Vec<String> = store.load(Tier::Recent).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn test_null_fields_survive_a_save() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path());
        fs::write(
            store.tier_path(Tier::Recent),
            r#"[{"id": "legacy", "content": "kept", "context": null, "tags": null,
                 "created_at": null, "use_count": 2, "last_used": null}]"#,
        )
        .unwrap();

        let loaded = store.load(Tier::Recent);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "legacy");
        assert_eq!(loaded[0].use_count, 2);

        store.save(Tier::Recent, &loaded).unwrap();
        let reloaded = store.load(Tier::Recent);
        assert_eq!(reloaded, loaded);
        assert_eq!(reloaded[0].content, "kept");
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let store = EntryStore::new(dir.path());
        store.save(Tier::Recent, &[entry("a")]).unwrap();
        store.save(Tier::Recent, &[entry("b")]).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["recent.json"]);
    }

    #[test]
    fn test_unwritable_root_reports_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let store = EntryStore::new(blocker.join("learnings"));
        let err = store.save(Tier::Hot, &[entry("a")]).unwrap_err();
        assert!(matches!(err, Error::StorageUnwritable { .. }));
    }
}
