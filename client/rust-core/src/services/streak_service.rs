use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::progress::StreakRecord;
use crate::storage::ProfileStorage;
use crate::utils::time;

/// Daily streak rules:
/// - no previous record: streak starts at 1
/// - opened yesterday: streak + 1
/// - gap of more than one day: streak resets to 1
/// - reopened the same day: unchanged
pub fn update_streak(today: NaiveDate, previous: Option<&StreakRecord>) -> StreakRecord {
    let today_str = time::format_date(today);
    let Some(previous) = previous else {
        return StreakRecord {
            streak: 1,
            last_open_date: today_str,
        };
    };

    match time::parse_date(&previous.last_open_date) {
        None => {
            tracing::warn!(
                "Unreadable lastOpenDate {:?}, restarting streak",
                previous.last_open_date
            );
            StreakRecord {
                streak: 1,
                last_open_date: today_str,
            }
        }
        Some(last_open) => {
            let streak = match time::days_between(last_open, today) {
                0 => previous.streak,
                1 => previous.streak + 1,
                // Longer gaps and clock rollbacks both break the streak
                _ => 1,
            };
            StreakRecord {
                streak,
                last_open_date: today_str,
            }
        }
    }
}

pub struct StreakService {
    storage: Arc<ProfileStorage>,
}

impl StreakService {
    pub fn new(storage: Arc<ProfileStorage>) -> Self {
        Self { storage }
    }

    /// Apply the streak rules for an app open and persist the result.
    pub fn record_open(&self, today: NaiveDate) -> StreakRecord {
        let previous = self.storage.streak();
        let updated = update_streak(today, previous.as_ref());
        self.storage.set_streak(&updated);
        tracing::debug!(
            "Streak updated: {} day(s), last open {}",
            updated.streak,
            updated.last_open_date
        );
        updated
    }

    pub fn current(&self) -> u32 {
        self.storage.streak().map(|record| record.streak).unwrap_or(0)
    }
}
