use serde::{Deserialize, Serialize};
use validator::Validate;

/// One leaderboard row. The backend returns two shapes: daily rows carry
/// `score`/`time_taken`/`date`, all-time rows carry `total_score`/`best_score`/
/// `games_played`. Absent fields decode as `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    #[serde(rename = "user_name")]
    pub display_name: String,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(default)]
    pub best_score: Option<i64>,
    #[serde(default)]
    pub games_played: Option<u32>,
    #[serde(default)]
    pub time_taken: Option<u32>,
    #[serde(default)]
    pub date: Option<String>,
}

impl LeaderboardEntry {
    /// The points column to display, whichever shape this row came from.
    pub fn points(&self) -> i64 {
        self.score.or(self.total_score).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardPeriod {
    Today,
    AllTime,
}

impl LeaderboardPeriod {
    pub fn as_query(&self) -> &'static str {
        match self {
            LeaderboardPeriod::Today => "today",
            LeaderboardPeriod::AllTime => "all",
        }
    }
}

// Wire names are part of the backend contract; the mix of camelCase and
// snake_case below is intentional.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSubmission {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub score: u32,
    #[serde(rename = "timeTaken")]
    pub time_taken: u32,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub puzzle_difficulty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitScoreResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub new_record: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RewardRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "rewardType")]
    pub reward_type: String,
    /// The backend rejects amounts outside (0, 100]; validate before sending.
    #[validate(range(min = 0.01, max = 100.0))]
    #[serde(rename = "rewardAmount")]
    pub reward_amount: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub new_total_points: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpsertUserRequest {
    pub uid: String,
    #[validate(length(min = 1, max = 50))]
    pub display_name: String,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUserResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserStats {
    pub user_id: String,
    pub display_name: String,
    pub streak: u32,
    pub total_points: i64,
    pub total_games: u32,
    pub best_score: i64,
    pub success_rate: f64,
    #[serde(default)]
    pub recent_scores: Vec<RecentScore>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentScore {
    pub score: i64,
    pub date: String,
    pub time_taken: u32,
}
