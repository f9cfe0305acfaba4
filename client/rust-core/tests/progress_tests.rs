use std::sync::Arc;

use tempfile::TempDir;

use dailybite_core::services::profile_service::{badges, ProfileService, DEFAULT_DISPLAY_NAME};
use dailybite_core::services::score_service::ScoreService;
use dailybite_core::storage::{ProfileStorage, KEY_TOTAL_POINTS};

mod common;
use common::RecordingBackend;

#[test]
fn points_accumulate_and_persist() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    {
        let storage = Arc::new(ProfileStorage::open(dir.path()).unwrap());
        let scores = ScoreService::new(storage.clone());
        assert_eq!(scores.total(), 0);
        assert_eq!(scores.add_points(140), 140);
        assert_eq!(scores.add_points(60), 200);
        // Stored as a stringified integer under the mobile key layout
        assert_eq!(storage.get(KEY_TOTAL_POINTS).as_deref(), Some("200"));
    }
    let storage = Arc::new(ProfileStorage::open(dir.path()).unwrap());
    let scores = ScoreService::new(storage);
    assert_eq!(scores.total(), 200);
}

#[test]
fn unreadable_points_fail_open_to_zero() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(ProfileStorage::open(dir.path()).unwrap());
    storage.set(KEY_TOTAL_POINTS, "NaN");
    let scores = ScoreService::new(storage);
    assert_eq!(scores.total(), 0);
    assert_eq!(scores.add_points(10), 10);
}

#[tokio::test]
async fn ensure_profile_creates_then_reuses_identity() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(ProfileStorage::open(dir.path()).unwrap());
    let backend = Arc::new(RecordingBackend::default());
    let service = ProfileService::new(storage.clone(), backend.clone());

    assert!(!service.has_onboarded());
    let profile = service.ensure_profile(Some("  Ada  ")).unwrap();
    assert_eq!(profile.display_name, "Ada");
    assert!(profile.is_anonymous);
    assert!(service.has_onboarded());

    // Same uid on the next run, name kept from storage
    let again = service.ensure_profile(None).unwrap();
    assert_eq!(again.uid, profile.uid);
    assert_eq!(again.display_name, "Ada");

    // The upsert is fire and forget; give it a beat
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    let users = backend.users.lock().unwrap();
    assert!(!users.is_empty());
    assert_eq!(users[0].uid, profile.uid);
    assert_eq!(users[0].display_name, "Ada");
}

#[tokio::test]
async fn ensure_profile_defaults_to_guest() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(ProfileStorage::open(dir.path()).unwrap());
    let service = ProfileService::new(storage, Arc::new(RecordingBackend::default()));
    let profile = service.ensure_profile(None).unwrap();
    assert_eq!(profile.display_name, DEFAULT_DISPLAY_NAME);
}

#[tokio::test]
async fn backend_failure_does_not_block_onboarding() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(ProfileStorage::open(dir.path()).unwrap());
    let service = ProfileService::new(storage, Arc::new(RecordingBackend::failing()));
    let profile = service.ensure_profile(Some("Grace")).unwrap();
    assert_eq!(profile.display_name, "Grace");
    assert!(service.has_onboarded());
    assert!(service.stats(&profile.uid).await.is_none());
}

#[test]
fn badge_thresholds() {
    let titles: Vec<&str> = badges(0, 0).iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["Getting Started"]);

    let titles: Vec<&str> = badges(7, 0).iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["Week Warrior"]);

    let titles: Vec<&str> = badges(30, 1000).iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["Week Warrior", "Month Master", "Point Collector"]);

    let titles: Vec<&str> = badges(2, 5000).iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["Point Collector", "Quiz Champion"]);
}
