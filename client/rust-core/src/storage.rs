use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::models::StreakRecord;

// Key spellings are inherited from the mobile client's AsyncStorage layout.
pub const KEY_DISPLAY_NAME: &str = "displayName";
pub const KEY_HAS_ONBOARDED: &str = "hasOnboarded";
pub const KEY_USER_STREAK: &str = "userStreak";
pub const KEY_TOTAL_POINTS: &str = "totalPoints";
pub const KEY_USER_ID: &str = "userId";

const STORE_FILE: &str = "profile.json";

/// String-keyed local store backed by one JSON file. Reads and writes are
/// fail-open: a broken file or a failed write is logged and the app keeps
/// going on in-memory state.
pub struct ProfileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl ProfileStorage {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        let path = dir.join(STORE_FILE);

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        "Unreadable profile store at {}, starting empty: {}",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read {}, starting empty: {}", path.display(), e);
                HashMap::new()
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        let snapshot = {
            let mut entries = match self.entries.lock() {
                Ok(entries) => entries,
                Err(poisoned) => poisoned.into_inner(),
            };
            entries.insert(key.to_string(), value.to_string());
            entries.clone()
        };
        if let Err(e) = self.persist(&snapshot) {
            tracing::warn!("Failed to persist {} to {}: {}", key, self.path.display(), e);
        }
    }

    // Atomic write: temp file in the same directory, then rename over the
    // previous store so a crash never leaves a half-written file.
    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        let payload = serde_json::to_string_pretty(entries).context("Failed to serialize store")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, payload)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    pub fn display_name(&self) -> Option<String> {
        self.get(KEY_DISPLAY_NAME)
    }

    pub fn set_display_name(&self, name: &str) {
        self.set(KEY_DISPLAY_NAME, name);
    }

    pub fn has_onboarded(&self) -> bool {
        self.get(KEY_HAS_ONBOARDED).as_deref() == Some("1")
    }

    pub fn mark_onboarded(&self) {
        self.set(KEY_HAS_ONBOARDED, "1");
    }

    pub fn user_id(&self) -> Option<String> {
        self.get(KEY_USER_ID)
    }

    pub fn set_user_id(&self, uid: &str) {
        self.set(KEY_USER_ID, uid);
    }

    pub fn streak(&self) -> Option<StreakRecord> {
        let raw = self.get(KEY_USER_STREAK)?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Unreadable {} value, ignoring: {}", KEY_USER_STREAK, e);
                None
            }
        }
    }

    pub fn set_streak(&self, record: &StreakRecord) {
        match serde_json::to_string(record) {
            Ok(raw) => self.set(KEY_USER_STREAK, &raw),
            Err(e) => tracing::warn!("Failed to serialize streak record: {}", e),
        }
    }

    /// Total points, 0 when missing or unparseable. Stored as a stringified
    /// integer to stay compatible with the mobile client's layout.
    pub fn total_points(&self) -> u64 {
        self.get(KEY_TOTAL_POINTS)
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(0)
    }

    pub fn set_total_points(&self, points: u64) {
        self.set(KEY_TOTAL_POINTS, &points.to_string());
    }
}
