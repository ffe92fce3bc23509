// src/backup/store.rs

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::Utc;
use tracing::{debug, warn};

use super::{BackupData, RetentionPolicy};
use crate::{
    constants::{BACKUP_DIR_NAME, BACKUP_FILE_NAME, TEMP_FILE_SUFFIX},
    errors::StoreError,
};

/// Handle to the backup document on disk. All file access goes through this type.
#[derive(Debug)]
pub struct BackupStore {
    dir: PathBuf,
    file: PathBuf,
    policy: RetentionPolicy,
    /// Serializes load-modify-save cycles within this process.
    lock: Mutex<()>,
}

impl BackupStore {
    /// Store rooted at `<data_dir>/backups/registry-backups.json`.
    pub fn new(data_dir: &Path) -> Self {
        let dir = data_dir.join(BACKUP_DIR_NAME);
        let file = dir.join(BACKUP_FILE_NAME);
        Self {
            dir,
            file,
            policy: RetentionPolicy::default(),
            lock: Mutex::new(()),
        }
    }

    pub fn with_policy(mut self, policy: RetentionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    fn temp_path(&self) -> PathBuf {
        self.file.with_extension(format!(
            "{}.{}",
            self.file
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default(),
            TEMP_FILE_SUFFIX
        ))
    }

    fn ensure_dir(&self) {
        // Another caller may have created it concurrently; any real problem surfaces on write.
        if let Err(e) = fs::create_dir_all(&self.dir) {
            debug!("Ignoring failure to create '{}': {}", self.dir.display(), e);
        }
    }

    /// Reads the persisted document, falling back to an empty one when the file is
    /// missing, unreadable or structurally invalid.
    pub fn load(&self) -> BackupData {
        self.ensure_dir();

        let content = match fs::read_to_string(&self.file) {
            Ok(content) => content,
            Err(e) => {
                debug!(
                    "No readable backup file at '{}' ({}), starting empty.",
                    self.file.display(),
                    e
                );
                return BackupData::default();
            }
        };

        match serde_json::from_str::<BackupData>(&content) {
            Ok(data) if !data.version.is_empty() => data,
            Ok(_) => {
                warn!("Backup file '{}' has no version, starting empty.", self.file.display());
                BackupData::default()
            }
            Err(e) => {
                warn!(
                    "Backup file '{}' is invalid ({}), starting empty.",
                    self.file.display(),
                    e
                );
                BackupData::default()
            }
        }
    }

    /// Writes the document to a temporary file and renames it over the canonical path.
    pub fn save(&self, data: &BackupData) -> Result<(), StoreError> {
        self.ensure_dir();

        let json = serde_json::to_string_pretty(data)?;
        let temp = self.temp_path();

        fs::write(&temp, json).map_err(|source| StoreError::Write {
            path: temp.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(&temp, &self.file) {
            let _ = fs::remove_file(&temp);
            return Err(StoreError::Rename {
                from: temp,
                to: self.file.clone(),
                source,
            });
        }

        debug!(
            "Saved {} backups to '{}'.",
            data.backups.len(),
            self.file.display()
        );
        Ok(())
    }

    /// Applies this store's retention policy as of now. Does not persist.
    pub fn cleanup(&self, data: BackupData) -> BackupData {
        data.cleanup_with(&self.policy, Utc::now())
    }

    /// Reloads the document, hands it to `f`, and persists it if `f` succeeds.
    ///
    /// Other `update` calls on the same store wait until this one has saved.
    pub fn update<T, E>(&self, f: impl FnOnce(&mut BackupData) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut data = self.load();
        let value = f(&mut data)?;
        self.save(&data)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use super::*;
    use crate::backup::testing::entry;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempdir().unwrap();
        let store = BackupStore::new(dir.path());

        let data = store.load();
        assert_eq!(data, BackupData::default());
        assert_eq!(data.version, "1.0");
        assert!(dir.path().join("backups").is_dir());
    }

    #[test]
    fn test_load_malformed_returns_empty() {
        let dir = tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        for content in [
            "not json at all",
            r#"{"backups": []}"#,
            r#"{"version": "1.0", "backups": {}}"#,
            r#"{"version": "", "backups": []}"#,
            r#"{"version": "1.0", "backups": [{"id": "missing-fields"}]}"#,
        ] {
            fs::write(store.path(), content).unwrap();
            assert_eq!(store.load(), BackupData::default(), "content: {}", content);
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let mut data = BackupData::default();
        data.append(entry("telemetry-disable", now, 0, false));
        store.save(&data).unwrap();

        assert_eq!(store.load(), data);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_save_load_round_trip_is_byte_stable() {
        let dir = tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let mut data = BackupData::default();
        data.append(entry("a", now, 3, false));
        data.append(entry("b", now, 1, true));
        store.save(&data).unwrap();
        let first = fs::read(store.path()).unwrap();

        store.save(&store.load()).unwrap();
        let second = fs::read(store.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let dir = tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{
                "version": "1.0",
                "backups": [{
                    "id": "backup_1700000000000_feedback",
                    "timestamp": "2023-11-14T22:13:20.000Z",
                    "type": "auto",
                    "tweakId": "feedback",
                    "tweakName": "Feedback",
                    "category": "privacy",
                    "registryPath": "HKCU:\\SOFTWARE\\Microsoft\\Siuf\\Rules",
                    "registryName": "NumberOfSIUFInPeriod",
                    "previousValue": null,
                    "previousValueType": null,
                    "newValue": "0",
                    "canRestore": false,
                    "restored": false,
                    "restoredAt": null,
                    "origin": "future"
                }],
                "metadata": {"totalBackups": 1, "lastBackupTime": null, "lastCleanup": null},
                "profile": "default"
            }"#,
        )
        .unwrap();

        let data = store.load();
        assert_eq!(data.backups.len(), 1);
        assert!(!data.backups[0].can_restore);
        assert_eq!(data.backups[0].extra["origin"], "future");
        assert_eq!(data.extra["profile"], "default");

        store.save(&data).unwrap();
        let reloaded = store.load();
        assert_eq!(reloaded.backups[0].extra["origin"], "future");
        assert_eq!(reloaded.extra["profile"], "default");
    }

    #[test]
    fn test_foreign_entry_type_does_not_drop_store() {
        let dir = tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        let now = Utc::now();

        let mut data = BackupData::default();
        data.append(entry("a", now, 2, false));
        data.append(entry("b", now, 1, false));
        let mut json = serde_json::to_value(&data).unwrap();
        json["backups"][1]["type"] = "scheduled".into();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), serde_json::to_string(&json).unwrap()).unwrap();

        assert_eq!(store.load().backups.len(), 2);

        store
            .update(|data| {
                data.append(entry("c", now, 0, false));
                Ok::<_, StoreError>(())
            })
            .unwrap();
        let reloaded = store.load();
        assert_eq!(reloaded.backups.len(), 3);
        assert_eq!(reloaded.backups[1].kind, "scheduled");
    }

    #[test]
    fn test_failed_rename_leaves_canonical_path_untouched() {
        let dir = tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        // A directory at the canonical path makes the rename fail.
        fs::create_dir_all(store.path()).unwrap();

        let result = store.save(&BackupData::default());

        assert!(matches!(result, Err(StoreError::Rename { .. })));
        assert!(store.path().is_dir());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_update_persists_only_on_success() {
        let dir = tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        let now = Utc::now();

        store
            .update(|data| {
                data.append(entry("a", now, 0, false));
                Ok::<_, StoreError>(())
            })
            .unwrap();
        assert_eq!(store.load().backups.len(), 1);

        let result: Result<(), crate::errors::BackupError> = store.update(|data| {
            data.append(entry("b", now, 0, false));
            Err(crate::errors::BackupError::NotFound("b".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(store.load().backups.len(), 1);
    }
}
