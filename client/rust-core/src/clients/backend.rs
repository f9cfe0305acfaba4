use async_trait::async_trait;

use super::{BackendApi, ClientError, ClientResult};
use crate::models::leaderboard::{
    LeaderboardEntry, LeaderboardPeriod, RewardRequest, RewardResponse, ScoreSubmission,
    SubmitScoreResponse, UpsertUserRequest, UpsertUserResponse, UserStats,
};

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// `base_url` must already be trimmed of its trailing slash (Config does).
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn submit_score(
        &self,
        submission: &ScoreSubmission,
    ) -> ClientResult<SubmitScoreResponse> {
        let response = self
            .http
            .post(self.endpoint("/api/submit-score"))
            .json(submission)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn fetch_leaderboard(
        &self,
        period: LeaderboardPeriod,
    ) -> ClientResult<Vec<LeaderboardEntry>> {
        let response = self
            .http
            .get(self.endpoint("/api/leaderboard"))
            .query(&[("period", period.as_query())])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn process_reward(&self, request: &RewardRequest) -> ClientResult<RewardResponse> {
        let response = self
            .http
            .post(self.endpoint("/api/process-reward"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn fetch_user_stats(&self, user_id: &str) -> ClientResult<UserStats> {
        let response = self
            .http
            .get(self.endpoint(&format!("/api/user/{}/stats", user_id)))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn upsert_user(&self, request: &UpsertUserRequest) -> ClientResult<UpsertUserResponse> {
        let response = self
            .http
            .post(self.endpoint("/api/users"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }
}

/// Stands in when no backend URL is configured. Reads come back empty and
/// writes ack locally, so the rest of the app behaves as if offline.
pub struct NullBackend;

#[async_trait]
impl BackendApi for NullBackend {
    async fn submit_score(
        &self,
        submission: &ScoreSubmission,
    ) -> ClientResult<SubmitScoreResponse> {
        tracing::debug!(
            "No backend configured; score {} for {} stays local",
            submission.score,
            submission.user_id
        );
        Ok(SubmitScoreResponse {
            success: false,
            message: Some("No backend URL configured".to_string()),
            new_record: None,
        })
    }

    async fn fetch_leaderboard(
        &self,
        _period: LeaderboardPeriod,
    ) -> ClientResult<Vec<LeaderboardEntry>> {
        Ok(Vec::new())
    }

    async fn process_reward(&self, _request: &RewardRequest) -> ClientResult<RewardResponse> {
        Ok(RewardResponse {
            success: false,
            message: Some("No backend URL configured".to_string()),
            new_total_points: None,
        })
    }

    async fn fetch_user_stats(&self, _user_id: &str) -> ClientResult<UserStats> {
        Err(ClientError::Unconfigured)
    }

    async fn upsert_user(&self, _request: &UpsertUserRequest) -> ClientResult<UpsertUserResponse> {
        Ok(UpsertUserResponse {
            success: false,
            message: Some("No backend URL configured".to_string()),
        })
    }
}
