use std::sync::Arc;

use crate::storage::ProfileStorage;

/// Accumulates total points. There is deliberately no decrement: the local
/// total is monotonically non-decreasing for the lifetime of the profile.
#[derive(Clone)]
pub struct ScoreService {
    storage: Arc<ProfileStorage>,
}

impl ScoreService {
    pub fn new(storage: Arc<ProfileStorage>) -> Self {
        Self { storage }
    }

    /// Add points and persist; returns the new total.
    pub fn add_points(&self, points: u64) -> u64 {
        let total = self.storage.total_points().saturating_add(points);
        self.storage.set_total_points(total);
        total
    }

    pub fn total(&self) -> u64 {
        self.storage.total_points()
    }
}
