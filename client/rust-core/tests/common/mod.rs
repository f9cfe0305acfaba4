#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use dailybite_core::clients::{BackendApi, ClientError, ClientResult, ContentApi};
use dailybite_core::config::Config;
use dailybite_core::models::content::{FunFact, HistoryEvent};
use dailybite_core::models::leaderboard::{
    LeaderboardEntry, LeaderboardPeriod, RewardRequest, RewardResponse, ScoreSubmission,
    SubmitScoreResponse, UpsertUserRequest, UpsertUserResponse, UserStats,
};
use dailybite_core::models::puzzle::Puzzle;
use dailybite_core::models::UserProfile;
use dailybite_core::services::AppState;
use dailybite_core::storage::ProfileStorage;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn test_config(data_dir: &Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        backend_url: None,
        trivia_api_url: "https://opentdb.com/api.php".to_string(),
        history_api_url: "https://history.muffinlabs.com".to_string(),
        facts_api_url: "https://uselessfacts.jsph.pl/api/v2/facts/random".to_string(),
        numbers_api_url: "http://numbersapi.com".to_string(),
        puzzle_difficulty: "medium".to_string(),
        session_seconds: 30,
        max_hints: 2,
        http_timeout_seconds: 5,
    }
}

pub fn test_profile() -> UserProfile {
    UserProfile {
        uid: "user-1".to_string(),
        display_name: "Tester".to_string(),
        is_anonymous: true,
    }
}

/// AppState wired to stub clients over a temp data directory. Keep the
/// `TempDir` alive for the duration of the test.
pub fn test_state(
    dir: &TempDir,
    content: Arc<StubContent>,
    backend: Arc<RecordingBackend>,
) -> AppState {
    init_tracing();
    let storage = Arc::new(ProfileStorage::open(dir.path()).expect("temp storage"));
    AppState::with_clients(test_config(dir.path()), storage, content, backend)
}

#[derive(Default)]
pub struct StubContent {
    pub puzzle: Option<Puzzle>,
    pub history: Vec<HistoryEvent>,
    pub fact: Option<FunFact>,
    pub fail_history: bool,
    pub fail_fact: bool,
    pub puzzle_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub fact_calls: AtomicUsize,
}

impl StubContent {
    pub fn with_puzzle(puzzle: Puzzle) -> Self {
        Self {
            puzzle: Some(puzzle),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ContentApi for StubContent {
    async fn fetch_puzzle(&self) -> ClientResult<Puzzle> {
        self.puzzle_calls.fetch_add(1, Ordering::SeqCst);
        self.puzzle
            .clone()
            .ok_or_else(|| ClientError::Decode("stub: no puzzle".to_string()))
    }

    async fn fetch_history_events(&self, _month: u32, _day: u32) -> ClientResult<Vec<HistoryEvent>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_history {
            return Err(ClientError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        Ok(self.history.clone())
    }

    async fn fetch_fun_fact(&self) -> ClientResult<FunFact> {
        self.fact_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fact {
            return Err(ClientError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        self.fact
            .clone()
            .ok_or_else(|| ClientError::Decode("stub: no fact".to_string()))
    }
}

/// Records every write and serves canned reads; `fail` makes all calls error.
#[derive(Default)]
pub struct RecordingBackend {
    pub fail: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub submissions: Mutex<Vec<ScoreSubmission>>,
    pub rewards: Mutex<Vec<RewardRequest>>,
    pub users: Mutex<Vec<UpsertUserRequest>>,
}

impl RecordingBackend {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> ClientResult<()> {
        if self.fail {
            Err(ClientError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BackendApi for RecordingBackend {
    async fn submit_score(
        &self,
        submission: &ScoreSubmission,
    ) -> ClientResult<SubmitScoreResponse> {
        self.check()?;
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(SubmitScoreResponse {
            success: true,
            message: Some("Score submitted!".to_string()),
            new_record: Some(true),
        })
    }

    async fn fetch_leaderboard(
        &self,
        _period: LeaderboardPeriod,
    ) -> ClientResult<Vec<LeaderboardEntry>> {
        self.check()?;
        Ok(self.leaderboard.clone())
    }

    async fn process_reward(&self, request: &RewardRequest) -> ClientResult<RewardResponse> {
        self.check()?;
        self.rewards.lock().unwrap().push(request.clone());
        Ok(RewardResponse {
            success: true,
            message: Some("Reward processed successfully".to_string()),
            new_total_points: None,
        })
    }

    async fn fetch_user_stats(&self, user_id: &str) -> ClientResult<UserStats> {
        self.check()?;
        Ok(UserStats {
            user_id: user_id.to_string(),
            display_name: "Tester".to_string(),
            streak: 3,
            total_points: 420,
            total_games: 7,
            best_score: 160,
            success_rate: 71.4,
            recent_scores: Vec::new(),
        })
    }

    async fn upsert_user(&self, request: &UpsertUserRequest) -> ClientResult<UpsertUserResponse> {
        self.check()?;
        self.users.lock().unwrap().push(request.clone());
        Ok(UpsertUserResponse {
            success: true,
            message: Some("User created".to_string()),
        })
    }
}
