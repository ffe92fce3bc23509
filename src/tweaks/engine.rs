// src/tweaks/engine.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{DefaultValue, Tweak, TweakStates};
use crate::{
    backup::{store::BackupStore, BackupData, BackupEntry},
    constants::UNKNOWN_CATEGORY,
    errors::{BackupError, StoreError, TweakError},
    state::StateReader,
    utils::{
        command::CommandExecutor,
        registry::{reg_add_command, reg_delete_command},
    },
};

/// How a revert put the target back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertSource {
    /// Wrote the value captured in this backup.
    Backup(String),
    /// Wrote the catalog default.
    DefaultValue,
    /// Deleted the value, which is the stock state for this tweak.
    Deleted,
}

/// Successful result of [`TweakEngine::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum TweakOutcome {
    Applied {
        tweak_name: String,
        backup: BackupEntry,
        /// True when an existing active backup was reused instead of capturing a new one.
        reused: bool,
    },
    Reverted {
        tweak_name: String,
        source: RevertSource,
    },
}

impl TweakOutcome {
    pub fn message(&self) -> String {
        match self {
            TweakOutcome::Applied {
                tweak_name,
                reused: false,
                ..
            } => format!("{} applied successfully (backup created)", tweak_name),
            TweakOutcome::Applied {
                tweak_name,
                reused: true,
                ..
            } => format!("{} applied successfully (existing backup kept)", tweak_name),
            TweakOutcome::Reverted {
                tweak_name,
                source: RevertSource::Backup(_),
            } => format!("{} reverted to the previous value", tweak_name),
            TweakOutcome::Reverted {
                tweak_name,
                source: RevertSource::DefaultValue,
            } => format!("{} reset to the Windows default", tweak_name),
            TweakOutcome::Reverted {
                tweak_name,
                source: RevertSource::Deleted,
            } => format!("{} reset to the Windows default (value removed)", tweak_name),
        }
    }

    pub fn backup(&self) -> Option<&BackupEntry> {
        match self {
            TweakOutcome::Applied { backup, .. } => Some(backup),
            TweakOutcome::Reverted { .. } => None,
        }
    }
}

/// Applies and reverts tweaks, keeping the backup store in step.
pub struct TweakEngine {
    executor: Arc<dyn CommandExecutor>,
    reader: Box<dyn StateReader>,
    store: BackupStore,
}

impl TweakEngine {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        reader: Box<dyn StateReader>,
        store: BackupStore,
    ) -> Self {
        Self {
            executor,
            reader,
            store,
        }
    }

    pub fn store(&self) -> &BackupStore {
        &self.store
    }

    /// Activates the tweak, or reverts it when `is_reverting` is set.
    ///
    /// `category` is recorded on any backup created; an empty one is stored as "unknown".
    pub fn apply(
        &self,
        tweak: &Tweak,
        category: &str,
        is_reverting: bool,
    ) -> Result<TweakOutcome, TweakError> {
        if is_reverting {
            self.revert(tweak)
        } else {
            let category = if category.is_empty() {
                UNKNOWN_CATEGORY
            } else {
                category
            };
            self.activate(tweak, category)
        }
    }

    fn activate(&self, tweak: &Tweak, category: &str) -> Result<TweakOutcome, TweakError> {
        let tweak_name = tweak.name.to_string();

        if let Some(existing) = self.store.load().latest_active_for(tweak.id).cloned() {
            debug!("{} -> Reusing backup '{}'", tweak.id, existing.id);
            self.executor.execute(&tweak.command)?;
            info!("{} -> Applied", tweak.id);
            return Ok(TweakOutcome::Applied {
                tweak_name,
                backup: existing,
                reused: true,
            });
        }

        let previous = self.reader.read(&tweak.target);
        let captured = BackupEntry::capture(tweak, category, &previous, Utc::now());
        debug!(
            "{} -> Captured previous state (exists: {}, value: {:?})",
            tweak.id, previous.exists, previous.value
        );

        // Nothing is recorded for a change that did not happen.
        self.executor.execute(&tweak.command)?;

        let (backup, reused) = self.store.update(|data| {
            // A concurrent activation of the same tweak may have recorded first.
            if let Some(existing) = data.latest_active_for(tweak.id) {
                return Ok::<_, StoreError>((existing.clone(), true));
            }
            data.append(captured.clone());
            Ok((captured, false))
        })?;

        info!("{} -> Applied, backup '{}'", tweak.id, backup.id);
        Ok(TweakOutcome::Applied {
            tweak_name,
            backup,
            reused,
        })
    }

    /// Puts the target back: captured value first, then the catalog default.
    ///
    /// The backup stays active so that re-applying reuses it.
    fn revert(&self, tweak: &Tweak) -> Result<TweakOutcome, TweakError> {
        let tweak_name = tweak.name.to_string();
        let data = self.store.load();
        let latest = data.latest_active_for(tweak.id);

        if let Some(backup) = latest {
            if let Some((value, value_type)) = backup.restorable_value() {
                self.executor
                    .execute(&reg_add_command(&tweak.target, value_type, value))?;
                info!("{} -> Reverted from backup '{}'", tweak.id, backup.id);
                return Ok(TweakOutcome::Reverted {
                    tweak_name,
                    source: RevertSource::Backup(backup.id.clone()),
                });
            }
            debug!(
                "{} -> Backup '{}' holds no previous value, falling back to default",
                tweak.id, backup.id
            );
        }

        match &tweak.default_value {
            Some(DefaultValue::Delete) => {
                if let Err(e) = self.executor.execute(&reg_delete_command(&tweak.target)) {
                    // Already gone is the state we want.
                    warn!("{} -> Delete failed, treating as reverted: {}", tweak.id, e);
                }
                info!("{} -> Reverted by removing the value", tweak.id);
                Ok(TweakOutcome::Reverted {
                    tweak_name,
                    source: RevertSource::Deleted,
                })
            }
            Some(DefaultValue::Value(value)) => {
                self.executor
                    .execute(&reg_add_command(&tweak.target, tweak.value_type, value))?;
                info!("{} -> Reverted to default '{}'", tweak.id, value);
                Ok(TweakOutcome::Reverted {
                    tweak_name,
                    source: RevertSource::DefaultValue,
                })
            }
            None => {
                warn!("{} -> Nothing to revert to", tweak.id);
                Err(TweakError::NothingToRevert(tweak.id.to_string()))
            }
        }
    }

    /// Whether the target currently holds the tweak's expected value.
    pub fn is_active(&self, tweak: &Tweak) -> bool {
        let state = self.reader.read(&tweak.target);
        state.exists && state.value.as_deref().map(str::trim) == Some(tweak.expected_value)
    }

    /// Reads the live state of every given tweak.
    pub fn refresh_states<'a>(&self, tweaks: impl IntoIterator<Item = &'a Tweak>) -> TweakStates {
        let mut states = TweakStates::default();
        for tweak in tweaks {
            states.set(tweak.id, self.is_active(tweak));
        }
        states
    }

    pub fn list_backups(&self) -> BackupData {
        self.store.load()
    }

    /// Active backups recorded under `category`.
    pub fn backups_by_category(&self, category: &str) -> Vec<BackupEntry> {
        self.store
            .load()
            .by_category(category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Writes a backup's previous value back and marks it restored.
    pub fn restore_backup(&self, id: &str) -> Result<BackupEntry, BackupError> {
        self.store.update(|data| {
            let command = {
                let entry = data
                    .find(id)
                    .ok_or_else(|| BackupError::NotFound(id.to_string()))?;
                let (value, value_type) = entry
                    .restorable_value()
                    .ok_or_else(|| BackupError::CannotRestore(id.to_string()))?;
                if entry.restored {
                    return Err(BackupError::AlreadyRestored(id.to_string()));
                }
                reg_add_command(&entry.target(), value_type, value)
            };

            self.executor.execute(&command)?;

            let restored = data
                .mark_restored(id, Utc::now())
                .cloned()
                .ok_or_else(|| BackupError::NotFound(id.to_string()))?;
            info!("{} -> Restored backup '{}'", restored.tweak_id, id);
            Ok(restored)
        })
    }

    pub fn delete_backup(&self, id: &str) -> Result<BackupEntry, BackupError> {
        self.store.update(|data| {
            let removed = data
                .remove(id)
                .ok_or_else(|| BackupError::NotFound(id.to_string()))?;
            info!("{} -> Deleted backup '{}'", removed.tweak_id, id);
            Ok(removed)
        })
    }

    /// Applies the retention policy and returns how many entries were dropped.
    pub fn cleanup_backups(&self) -> Result<usize, StoreError> {
        self.store.update(|data| {
            let before = data.backups.len();
            *data = self.store.cleanup(std::mem::take(data));
            let removed = before - data.backups.len();
            info!("Backup cleanup removed {} entries", removed);
            Ok(removed)
        })
    }
}
