// src/backup/mod.rs

pub mod store;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    constants::{BACKUP_FORMAT_VERSION, BACKUP_KIND_AUTO, DEFAULT_MAX_BACKUPS, DEFAULT_RETENTION_DAYS},
    state::ValueState,
    tweaks::Tweak,
    utils::registry::{RegValueType, RegistryTarget},
};

fn default_kind() -> String {
    BACKUP_KIND_AUTO.to_string()
}

/// Prior state captured the first time a tweak was activated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Informational origin tag. Values written by other tools are kept as is.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub tweak_id: String,
    pub tweak_name: String,
    pub category: String,
    pub registry_path: String,
    pub registry_name: String,
    pub previous_value: Option<String>,
    pub previous_value_type: Option<RegValueType>,
    pub new_value: String,
    /// Only true when a previous value existed at capture time.
    pub can_restore: bool,
    #[serde(default)]
    pub restored: bool,
    #[serde(default)]
    pub restored_at: Option<DateTime<Utc>>,
    /// Fields written by newer versions, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BackupEntry {
    /// Builds the entry recorded when `tweak` is activated for the first time.
    pub fn capture(
        tweak: &Tweak,
        category: &str,
        previous: &ValueState,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("backup_{}_{}", now.timestamp_millis(), tweak.id),
            timestamp: now,
            kind: default_kind(),
            tweak_id: tweak.id.to_string(),
            tweak_name: tweak.name.to_string(),
            category: category.to_string(),
            registry_path: tweak.target.path.clone(),
            registry_name: tweak.target.name.clone(),
            previous_value: previous.value.clone(),
            previous_value_type: previous.value_type,
            new_value: tweak.expected_value.to_string(),
            can_restore: previous.exists,
            restored: false,
            restored_at: None,
            extra: Map::new(),
        }
    }

    pub fn target(&self) -> RegistryTarget {
        RegistryTarget::new(self.registry_path.clone(), self.registry_name.clone())
    }

    pub fn is_active(&self) -> bool {
        !self.restored
    }

    /// The value to write back, if this entry may be used for restoring.
    pub fn restorable_value(&self) -> Option<(&str, RegValueType)> {
        if !self.can_restore {
            return None;
        }
        self.previous_value
            .as_deref()
            .map(|value| (value, self.previous_value_type.unwrap_or_default()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    #[serde(default)]
    pub total_backups: usize,
    #[serde(default)]
    pub last_backup_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_cleanup: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole persisted backup document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackupData {
    pub version: String,
    pub backups: Vec<BackupEntry>,
    #[serde(default)]
    pub metadata: BackupMetadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for BackupData {
    fn default() -> Self {
        Self {
            version: BACKUP_FORMAT_VERSION.to_string(),
            backups: Vec::new(),
            metadata: BackupMetadata::default(),
            extra: Map::new(),
        }
    }
}

/// Age and count limits applied by cleanup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Restored entries older than this are dropped.
    pub max_age: Duration,
    pub max_entries: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::days(DEFAULT_RETENTION_DAYS),
            max_entries: DEFAULT_MAX_BACKUPS,
        }
    }
}

impl BackupData {
    pub fn active_for<'a>(&'a self, tweak_id: &'a str) -> impl Iterator<Item = &'a BackupEntry> {
        self.backups
            .iter()
            .filter(move |b| b.tweak_id == tweak_id && b.is_active())
    }

    /// Most recent non-restored entry for the tweak.
    pub fn latest_active_for<'a>(&'a self, tweak_id: &'a str) -> Option<&'a BackupEntry> {
        self.active_for(tweak_id).max_by_key(|b| b.timestamp)
    }

    pub fn find(&self, id: &str) -> Option<&BackupEntry> {
        self.backups.iter().find(|b| b.id == id)
    }

    /// Active entries recorded under `category`.
    pub fn by_category(&self, category: &str) -> Vec<&BackupEntry> {
        self.backups
            .iter()
            .filter(|b| b.category == category && b.is_active())
            .collect()
    }

    pub fn append(&mut self, entry: BackupEntry) {
        self.metadata.last_backup_time = Some(entry.timestamp);
        self.backups.push(entry);
        self.metadata.total_backups = self.backups.len();
    }

    pub fn remove(&mut self, id: &str) -> Option<BackupEntry> {
        let index = self.backups.iter().position(|b| b.id == id)?;
        let removed = self.backups.remove(index);
        self.metadata.total_backups = self.backups.len();
        Some(removed)
    }

    pub fn mark_restored(&mut self, id: &str, at: DateTime<Utc>) -> Option<&BackupEntry> {
        let entry = self.backups.iter_mut().find(|b| b.id == id)?;
        entry.restored = true;
        entry.restored_at = Some(at);
        Some(entry)
    }

    /// Applies the default retention policy as of now.
    pub fn cleanup(self) -> Self {
        self.cleanup_with(&RetentionPolicy::default(), Utc::now())
    }

    /// Drops restored entries older than the policy's age limit, then keeps only the
    /// newest `max_entries` if there are still too many.
    pub fn cleanup_with(mut self, policy: &RetentionPolicy, now: DateTime<Utc>) -> Self {
        let cutoff = now - policy.max_age;
        self.backups.retain(|b| !b.restored || b.timestamp > cutoff);

        if self.backups.len() > policy.max_entries {
            self.backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            self.backups.truncate(policy.max_entries);
        }

        self.metadata.last_cleanup = Some(now);
        self.metadata.total_backups = self.backups.len();
        self
    }
}
