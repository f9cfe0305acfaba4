use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex};
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::clients::{BackendApi, ContentApi};
use crate::models::leaderboard::ScoreSubmission;
use crate::models::puzzle::{HintUse, Puzzle, SessionOutcome, SessionPhase, SessionSnapshot};
use crate::models::reward::AdEvent;
use crate::models::timer::{TimeExpired, TimerEvent, TimerTick};
use crate::models::UserProfile;
use crate::services::puzzle_session::{PuzzleSession, SessionRules, SessionStateError, TickResult};
use crate::services::reward_service::{RewardEvents, RewardService};
use crate::services::score_service::ScoreService;
use crate::services::AppState;
use crate::utils::retry::{retry_async, RetryConfig};
use crate::utils::task::AbortOnDrop;
use crate::utils::time;

const EVENT_CHANNEL_CAPACITY: usize = 64;
const TICK_INTERVAL: Duration = Duration::from_secs(1);
const HINT_REWARD_TYPE: &str = "hint";

pub struct SessionService {
    rules: SessionRules,
    content: Arc<dyn ContentApi>,
    backend: Arc<dyn BackendApi>,
    score: ScoreService,
    rewards: RewardEvents,
}

impl SessionService {
    pub fn new(state: &AppState) -> Self {
        Self {
            rules: SessionRules::from_config(&state.config),
            content: state.content.clone(),
            backend: state.backend.clone(),
            score: ScoreService::new(state.storage.clone()),
            rewards: state.rewards.clone(),
        }
    }

    /// Fetch today's puzzle and wrap it in a session. A fetch failure falls
    /// back to the fixed puzzle instead of failing the session.
    pub async fn begin(&self, user: UserProfile) -> SessionHandle {
        let puzzle = match self.content.fetch_puzzle().await {
            Ok(puzzle) => puzzle,
            Err(e) => {
                tracing::warn!("Puzzle fetch failed, using fallback puzzle: {}", e);
                Puzzle::fallback()
            }
        };
        self.attach(user, puzzle)
    }

    /// Build a session around an already-fetched puzzle.
    pub fn attach(&self, user: UserProfile, puzzle: Puzzle) -> SessionHandle {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        SessionHandle {
            id: Uuid::new_v4().to_string(),
            user,
            rules: self.rules,
            session: Arc::new(Mutex::new(PuzzleSession::new(puzzle, self.rules))),
            events,
            backend: self.backend.clone(),
            score: self.score.clone(),
            rewards: self.rewards.clone(),
            reward_service: RewardService::new(self.backend.clone()),
            timer: Mutex::new(None),
            reward_listener: Mutex::new(None),
        }
    }
}

/// One player's attempt at the daily puzzle. Owns the countdown task and the
/// reward subscription; dropping the handle cancels both, so nothing can tick
/// or mutate a session that navigation has already torn down.
pub struct SessionHandle {
    id: String,
    user: UserProfile,
    rules: SessionRules,
    session: Arc<Mutex<PuzzleSession>>,
    events: broadcast::Sender<TimerEvent>,
    backend: Arc<dyn BackendApi>,
    score: ScoreService,
    rewards: RewardEvents,
    reward_service: RewardService,
    timer: Mutex<Option<AbortOnDrop>>,
    reward_listener: Mutex<Option<AbortOnDrop>>,
}

impl SessionHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    pub async fn puzzle(&self) -> Puzzle {
        self.session.lock().await.puzzle().clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Begin (or restart) the countdown.
    pub async fn start(&self) -> Result<(), SessionStateError> {
        let run_id = {
            let mut session = self.session.lock().await;
            session.start()?
        };
        tracing::info!("Session {} started (run {})", self.id, run_id);
        self.spawn_timer(run_id).await;
        self.spawn_reward_listener(run_id).await;
        Ok(())
    }

    /// Lock in an answer. Finishes the run, stops the countdown, and on a
    /// scoring answer credits points locally and reports the score remotely.
    pub async fn select_answer(&self, answer: &str) -> Result<SessionOutcome, SessionStateError> {
        let (outcome, category, difficulty) = {
            let mut session = self.session.lock().await;
            let outcome = session.select_answer(answer)?;
            let puzzle = session.puzzle();
            (outcome, puzzle.category.clone(), puzzle.difficulty)
        };
        self.stop_tasks().await;

        if outcome.score > 0 {
            let total = self.score.add_points(u64::from(outcome.score));
            tracing::info!(
                "Session {} finished: score={}, total_points={}",
                self.id,
                outcome.score,
                total
            );
            self.submit_score(&outcome, category, difficulty.as_str());
        } else {
            tracing::info!("Session {} finished without scoring", self.id);
        }
        Ok(outcome)
    }

    /// Eliminate wrong answers. Past the limit this is a no-op.
    pub async fn use_hint(&self) -> Result<HintUse, SessionStateError> {
        let result = {
            let mut session = self.session.lock().await;
            session.use_hint(&mut rand::rng())
        }?;
        match &result {
            HintUse::Revealed(hidden) => {
                tracing::info!("Session {}: hint eliminated answers {:?}", self.id, hidden);
            }
            HintUse::Exhausted => {
                tracing::debug!("Session {}: hint limit reached", self.id);
            }
        }
        Ok(result)
    }

    async fn spawn_timer(&self, run_id: u64) {
        let session = self.session.clone();
        let events = self.events.clone();
        let session_id = self.id.clone();
        let total_seconds = self.rules.duration_seconds;

        let handle = tokio::spawn(async move {
            let mut elapsed = 0u32;
            loop {
                sleep(TICK_INTERVAL).await;
                let mut guard = session.lock().await;
                if guard.run_id() != run_id {
                    break;
                }
                elapsed += 1;
                let tick = guard.tick();
                drop(guard);
                match tick {
                    TickResult::Running { remaining_seconds } => {
                        // Nobody listening is fine; the countdown still drives state.
                        let _ = events.send(TimerEvent::TimerTick(TimerTick {
                            session_id: session_id.clone(),
                            remaining_seconds,
                            elapsed_seconds: elapsed,
                            total_seconds,
                            timestamp: Utc::now(),
                        }));
                    }
                    TickResult::Expired(_) => {
                        let _ = events.send(TimerEvent::TimeExpired(TimeExpired {
                            session_id: session_id.clone(),
                            timestamp: Utc::now(),
                        }));
                        tracing::info!("Session {} ran out of time", session_id);
                        break;
                    }
                    TickResult::Ignored => break,
                }
            }
        });

        *self.timer.lock().await = Some(AbortOnDrop::new(handle));
    }

    // The reward subscription lives exactly as long as this task; aborting it
    // drops the receiver, which is the unsubscribe.
    async fn spawn_reward_listener(&self, run_id: u64) {
        let mut receiver = self.rewards.subscribe();
        let session = self.session.clone();
        let reward_service = self.reward_service.clone();
        let user = self.user.clone();
        let session_id = self.id.clone();

        let handle = tokio::spawn(async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!("Reward listener lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let AdEvent::EarnedReward {
                    reward_type,
                    amount,
                } = event
                else {
                    continue;
                };
                if reward_type != HINT_REWARD_TYPE {
                    continue;
                }

                let hint = {
                    let mut guard = session.lock().await;
                    if guard.run_id() != run_id || guard.phase() != SessionPhase::Running {
                        break;
                    }
                    guard.use_hint(&mut rand::rng())
                };
                match hint {
                    Ok(HintUse::Revealed(hidden)) => {
                        tracing::info!(
                            "Session {}: reward unlocked a hint, eliminated {:?}",
                            session_id,
                            hidden
                        );
                        if let Err(e) = reward_service.report(&user.uid, &reward_type, amount).await
                        {
                            tracing::warn!("Reward report failed: {:#}", e);
                        }
                    }
                    Ok(HintUse::Exhausted) => {
                        tracing::debug!(
                            "Session {}: reward hint ignored, limit reached",
                            session_id
                        );
                    }
                    Err(_) => break,
                }
            }
        });

        *self.reward_listener.lock().await = Some(AbortOnDrop::new(handle));
    }

    fn submit_score(&self, outcome: &SessionOutcome, category: String, difficulty: &str) {
        let backend = self.backend.clone();
        let submission = ScoreSubmission {
            user_id: self.user.uid.clone(),
            score: outcome.score,
            time_taken: outcome.time_taken_seconds,
            date: time::format_date(time::today_utc()),
            puzzle_category: Some(category),
            puzzle_difficulty: Some(difficulty.to_string()),
        };
        let session_id = self.id.clone();
        // Fire and forget: a lost submission never blocks or fails the session.
        tokio::spawn(async move {
            let result = retry_async(RetryConfig::default(), || async {
                backend.submit_score(&submission).await
            })
            .await;
            match result {
                Ok(ack) if ack.success => {
                    tracing::info!(
                        "Score submitted: session={}, new_record={:?}",
                        session_id,
                        ack.new_record
                    );
                }
                Ok(ack) => {
                    tracing::debug!(
                        "Score not recorded remotely: session={}, message={:?}",
                        session_id,
                        ack.message
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Score submission failed: session={}, error={}",
                        session_id,
                        e
                    );
                }
            }
        });
    }

    async fn stop_tasks(&self) {
        self.timer.lock().await.take();
        self.reward_listener.lock().await.take();
    }
}
