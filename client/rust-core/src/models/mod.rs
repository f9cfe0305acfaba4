use serde::{Deserialize, Serialize};

/// Local identity of the player. Auth providers are out of scope, so every
/// profile is anonymous with a generated uid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: String,
    pub is_anonymous: bool,
}

pub mod content;
pub mod leaderboard;
pub mod progress;
pub mod puzzle;
pub mod reward;
pub mod timer;

pub use content::{FunFact, HistoryEvent, TodayContent};
pub use progress::StreakRecord;
pub use puzzle::{Difficulty, Puzzle, SessionPhase};
