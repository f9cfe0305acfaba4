use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::clients::{BackendApi, ContentApi, HttpBackend, HttpContentClient, NullBackend};
use crate::config::Config;
use crate::services::reward_service::RewardEvents;
use crate::storage::ProfileStorage;

/// Explicit, injectable application state. Everything downstream receives
/// this (or pieces of it) instead of reaching for ambient globals.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<ProfileStorage>,
    pub content: Arc<dyn ContentApi>,
    pub backend: Arc<dyn BackendApi>,
    pub rewards: RewardEvents,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let storage = Arc::new(ProfileStorage::open(&config.data_dir)?);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        let content: Arc<dyn ContentApi> = Arc::new(HttpContentClient::new(http.clone(), &config));

        let backend: Arc<dyn BackendApi> = match &config.backend_url {
            Some(url) => {
                tracing::info!("Backend configured at {}", url);
                Arc::new(HttpBackend::new(http, url.clone()))
            }
            None => {
                tracing::warn!("No backend URL configured; scores and rewards stay local");
                Arc::new(NullBackend)
            }
        };

        Ok(Self {
            config,
            storage,
            content,
            backend,
            rewards: RewardEvents::new(),
        })
    }

    /// Assemble state from pre-built parts. Tests inject stub clients here.
    pub fn with_clients(
        config: Config,
        storage: Arc<ProfileStorage>,
        content: Arc<dyn ContentApi>,
        backend: Arc<dyn BackendApi>,
    ) -> Self {
        Self {
            config,
            storage,
            content,
            backend,
            rewards: RewardEvents::new(),
        }
    }
}

pub mod content_service;
pub mod profile_service;
pub mod puzzle_session;
pub mod reward_service;
pub mod score_service;
pub mod session_service;
pub mod streak_service;
