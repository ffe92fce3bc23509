// src/constants.rs

/// Format tag written at the top of the backup document.
pub const BACKUP_FORMAT_VERSION: &str = "1.0";

// Location of the backup document, relative to the data directory.
pub const BACKUP_DIR_NAME: &str = "backups";
pub const BACKUP_FILE_NAME: &str = "registry-backups.json";
pub const TEMP_FILE_SUFFIX: &str = "tmp";

/// `type` tag of entries captured on first activation.
pub const BACKUP_KIND_AUTO: &str = "auto";

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const APP_DIR_NAME: &str = "tweak_tool";

// Retention policy applied by cleanup.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;
pub const DEFAULT_MAX_BACKUPS: usize = 100;
pub const MIN_RETENTION_DAYS: i64 = 1;
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// Catalog marker meaning "delete the value instead of writing a default".
pub const DELETE_SENTINEL: &str = "DELETE";

/// Category recorded when the caller does not name one.
pub const UNKNOWN_CATEGORY: &str = "unknown";

// Environment overrides for the configuration.
pub const ENV_DATA_DIR: &str = "TWEAK_TOOL_DATA_DIR";
pub const ENV_RETENTION_DAYS: &str = "TWEAK_TOOL_RETENTION_DAYS";
pub const ENV_MAX_BACKUPS: &str = "TWEAK_TOOL_MAX_BACKUPS";

/// Pause between killing and restarting explorer.exe.
pub const EXPLORER_RESTART_DELAY_MS: u64 = 500;
