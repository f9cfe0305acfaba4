use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dailybite_core::clients::BackendApi;
use dailybite_core::models::leaderboard::LeaderboardPeriod;
use dailybite_core::services::content_service::ContentService;
use dailybite_core::services::profile_service::{self, ProfileService};
use dailybite_core::services::score_service::ScoreService;
use dailybite_core::services::streak_service::StreakService;
use dailybite_core::utils::time;
use dailybite_core::{AppState, Config};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dailybite_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Daily Bite core");

    let config = Config::load().expect("Failed to load configuration");
    let state = AppState::new(config).expect("Failed to initialize application state");

    // Launch flow: profile -> streak -> today's content -> leaderboard.
    let profiles = ProfileService::new(state.storage.clone(), state.backend.clone());
    let profile = profiles
        .ensure_profile(None)
        .expect("Failed to prepare local profile");
    tracing::info!("Welcome, {}!", profile.display_name);

    let today = time::today_utc();
    let streaks = StreakService::new(state.storage.clone());
    let streak = streaks.record_open(today);
    tracing::info!("Daily streak: {} day(s)", streak.streak);

    let content = ContentService::new(state.content.clone());
    let today_content = content.today(today).await;
    for event in &today_content.history {
        tracing::info!("On this day, {}: {}", event.year, event.text);
    }
    tracing::info!(
        "Fun fact: {} ({})",
        today_content.fun_fact.text,
        today_content.fun_fact.source
    );

    let scores = ScoreService::new(state.storage.clone());
    for badge in profile_service::badges(streak.streak, scores.total()) {
        tracing::info!("Achievement: {} ({})", badge.title, badge.description);
    }
    tracing::info!("Total points: {}", scores.total());

    match state.backend.fetch_leaderboard(LeaderboardPeriod::Today).await {
        Ok(entries) if entries.is_empty() => tracing::info!("Leaderboard is empty today"),
        Ok(entries) => {
            for entry in entries.iter().take(10) {
                tracing::info!("#{} {}: {}", entry.rank, entry.display_name, entry.points());
            }
        }
        Err(e) => tracing::warn!("Leaderboard unavailable: {}", e),
    }
}
