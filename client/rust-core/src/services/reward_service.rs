use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::broadcast;
use validator::Validate;

use crate::clients::BackendApi;
use crate::models::leaderboard::{RewardRequest, RewardResponse};
use crate::models::reward::AdEvent;
use crate::utils::retry::{retry_async, RetryConfig};

const CHANNEL_CAPACITY: usize = 32;

/// Broadcast bridge for ad SDK callbacks. The shell publishes events; any
/// interested component subscribes for the scope that needs them, and
/// dropping the receiver is the unsubscribe.
#[derive(Clone)]
pub struct RewardEvents {
    tx: broadcast::Sender<AdEvent>,
}

impl RewardEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: AdEvent) {
        // send only errors when nobody is subscribed, which is fine here
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for RewardEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct RewardService {
    backend: Arc<dyn BackendApi>,
}

impl RewardService {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self { backend }
    }

    /// Validate and report an earned ad reward. The backend deduplicates by
    /// transaction hash, so retrying here is safe.
    pub async fn report(
        &self,
        user_id: &str,
        reward_type: &str,
        amount: f64,
    ) -> Result<RewardResponse> {
        let request = RewardRequest {
            user_id: user_id.to_string(),
            reward_type: reward_type.to_string(),
            reward_amount: amount,
            timestamp: Utc::now().to_rfc3339(),
        };
        request
            .validate()
            .with_context(|| format!("Rejecting reward of {} for {}", amount, user_id))?;

        let response = retry_async(RetryConfig::default(), || async {
            self.backend.process_reward(&request).await
        })
        .await
        .context("Failed to report reward")?;

        if response.success {
            tracing::info!(
                "Reward processed for {}: type={}, amount={}",
                user_id,
                reward_type,
                amount
            );
        } else {
            tracing::debug!(
                "Reward not processed for {}: {:?}",
                user_id,
                response.message
            );
        }
        Ok(response)
    }
}
