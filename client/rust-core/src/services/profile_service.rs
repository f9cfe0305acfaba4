use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;
use validator::Validate;

use crate::clients::BackendApi;
use crate::models::leaderboard::{UpsertUserRequest, UserStats};
use crate::models::progress::Badge;
use crate::models::UserProfile;
use crate::storage::ProfileStorage;

pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

pub struct ProfileService {
    storage: Arc<ProfileStorage>,
    backend: Arc<dyn BackendApi>,
}

impl ProfileService {
    pub fn new(storage: Arc<ProfileStorage>, backend: Arc<dyn BackendApi>) -> Self {
        Self { storage, backend }
    }

    /// Load the local profile, creating it on first run. The backend upsert is
    /// fire and forget; onboarding never blocks on the network.
    pub fn ensure_profile(&self, name: Option<&str>) -> Result<UserProfile> {
        let display_name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => self
                .storage
                .display_name()
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
        };

        let uid = match self.storage.user_id() {
            Some(uid) => uid,
            None => {
                let uid = Uuid::new_v4().to_string();
                self.storage.set_user_id(&uid);
                uid
            }
        };

        let request = UpsertUserRequest {
            uid: uid.clone(),
            display_name: display_name.clone(),
            is_anonymous: true,
        };
        request.validate().context("Invalid display name")?;

        self.storage.set_display_name(&display_name);
        if !self.storage.has_onboarded() {
            self.storage.mark_onboarded();
            tracing::info!("Profile created for {}", display_name);
        }

        let backend = self.backend.clone();
        tokio::spawn(async move {
            if let Err(e) = backend.upsert_user(&request).await {
                tracing::debug!("User upsert skipped: {}", e);
            }
        });

        Ok(UserProfile {
            uid,
            display_name,
            is_anonymous: true,
        })
    }

    pub fn has_onboarded(&self) -> bool {
        self.storage.has_onboarded()
    }

    /// Backend statistics for the profile screen; `None` when unavailable.
    pub async fn stats(&self, user_id: &str) -> Option<UserStats> {
        match self.backend.fetch_user_stats(user_id).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::debug!("User stats unavailable: {}", e);
                None
            }
        }
    }
}

/// Achievement badges derived from local progress.
pub fn badges(streak: u32, total_points: u64) -> Vec<Badge> {
    let mut badges = Vec::new();
    if streak >= 7 {
        badges.push(Badge {
            title: "Week Warrior",
            description: "7-day streak",
            icon: "flame",
        });
    }
    if streak >= 30 {
        badges.push(Badge {
            title: "Month Master",
            description: "30-day streak",
            icon: "medal",
        });
    }
    if total_points >= 1000 {
        badges.push(Badge {
            title: "Point Collector",
            description: "1000+ points",
            icon: "trophy",
        });
    }
    if total_points >= 5000 {
        badges.push(Badge {
            title: "Quiz Champion",
            description: "5000+ points",
            icon: "star",
        });
    }
    if badges.is_empty() {
        badges.push(Badge {
            title: "Getting Started",
            description: "Keep playing to unlock more!",
            icon: "ribbon",
        });
    }
    badges
}
