use serde::{Deserialize, Serialize};

/// Persisted under the `userStreak` key, dates formatted as `%Y-%m-%d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub streak: u32,
    #[serde(rename = "lastOpenDate")]
    pub last_open_date: String,
}

/// Achievement unlocked by local progress thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}
