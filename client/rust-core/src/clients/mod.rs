use async_trait::async_trait;

use crate::models::content::{FunFact, HistoryEvent};
use crate::models::leaderboard::{
    LeaderboardEntry, LeaderboardPeriod, RewardRequest, RewardResponse, ScoreSubmission,
    SubmitScoreResponse, UpsertUserRequest, UpsertUserResponse, UserStats,
};
use crate::models::puzzle::Puzzle;

pub mod backend;
pub mod content;

pub use backend::{HttpBackend, NullBackend};
pub use content::HttpContentClient;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("unexpected payload: {0}")]
    Decode(String),
    #[error("backend URL not configured")]
    Unconfigured,
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Third-party daily content sources (trivia, history, fun fact). Callers own
/// the fallbacks: a failed puzzle fetch is replaced with `Puzzle::fallback()`,
/// failed history with an empty list, a failed fact with the literal default.
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn fetch_puzzle(&self) -> ClientResult<Puzzle>;
    async fn fetch_history_events(&self, month: u32, day: u32) -> ClientResult<Vec<HistoryEvent>>;
    async fn fetch_fun_fact(&self) -> ClientResult<FunFact>;
}

/// The app backend REST API. All calls are best-effort from the client's point
/// of view; no failure here may fail local state transitions.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn submit_score(&self, submission: &ScoreSubmission) -> ClientResult<SubmitScoreResponse>;
    async fn fetch_leaderboard(
        &self,
        period: LeaderboardPeriod,
    ) -> ClientResult<Vec<LeaderboardEntry>>;
    async fn process_reward(&self, request: &RewardRequest) -> ClientResult<RewardResponse>;
    async fn fetch_user_stats(&self, user_id: &str) -> ClientResult<UserStats>;
    async fn upsert_user(&self, request: &UpsertUserRequest) -> ClientResult<UpsertUserResponse>;
}
