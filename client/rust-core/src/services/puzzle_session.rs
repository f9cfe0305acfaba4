use std::collections::HashSet;

use rand::Rng;

use crate::config::Config;
use crate::models::puzzle::{HintUse, Puzzle, SessionOutcome, SessionPhase, SessionSnapshot};

// Scoring: base + 2 per remaining second, minus 10 per hint, never negative.
pub const BASE_SCORE: u32 = 100;
pub const TIME_BONUS_PER_SECOND: u32 = 2;
pub const HINT_PENALTY: u32 = 10;
const ANSWERS_PER_HINT: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct SessionRules {
    pub duration_seconds: u32,
    pub max_hints: u32,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            duration_seconds: 30,
            max_hints: 2,
        }
    }
}

impl SessionRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            duration_seconds: config.session_seconds,
            max_hints: config.max_hints,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionStateError {
    #[error("session is not running")]
    NotRunning,
    #[error("session is already running")]
    AlreadyRunning,
}

#[derive(Debug)]
pub enum TickResult {
    Running { remaining_seconds: u32 },
    Expired(SessionOutcome),
    Ignored,
}

/// The daily-puzzle state machine: `Idle -> Running -> Finished`, restartable
/// from `Finished`. Pure and synchronous; `SessionService` drives it and owns
/// every side effect.
#[derive(Debug)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    rules: SessionRules,
    phase: SessionPhase,
    remaining_seconds: u32,
    hints_used: u32,
    hidden_answers: HashSet<usize>,
    selected_answer: Option<String>,
    score: Option<u32>,
    run_id: u64,
}

impl PuzzleSession {
    pub fn new(puzzle: Puzzle, rules: SessionRules) -> Self {
        Self {
            puzzle,
            rules,
            phase: SessionPhase::Idle,
            remaining_seconds: rules.duration_seconds,
            hints_used: 0,
            hidden_answers: HashSet::new(),
            selected_answer: None,
            score: None,
            run_id: 0,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Increments on every `start()`; stale timer tasks compare against it
    /// before touching the session.
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn score(&self) -> Option<u32> {
        self.score
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut hidden_answers: Vec<usize> = self.hidden_answers.iter().copied().collect();
        hidden_answers.sort_unstable();
        SessionSnapshot {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            hints_used: self.hints_used,
            hidden_answers,
            selected_answer: self.selected_answer.clone(),
            score: self.score,
        }
    }

    /// Idle/Finished -> Running, resetting the countdown, hints and score.
    /// Returns the new run id.
    pub fn start(&mut self) -> Result<u64, SessionStateError> {
        if self.phase == SessionPhase::Running {
            return Err(SessionStateError::AlreadyRunning);
        }
        self.phase = SessionPhase::Running;
        self.remaining_seconds = self.rules.duration_seconds;
        self.hints_used = 0;
        self.hidden_answers.clear();
        self.selected_answer = None;
        self.score = None;
        self.run_id += 1;
        Ok(self.run_id)
    }

    /// One countdown second. At zero the session finishes with score 0.
    pub fn tick(&mut self) -> TickResult {
        if self.phase != SessionPhase::Running {
            return TickResult::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = SessionPhase::Finished;
            self.score = Some(0);
            return TickResult::Expired(SessionOutcome {
                correct: false,
                score: 0,
                time_taken_seconds: self.rules.duration_seconds,
            });
        }
        TickResult::Running {
            remaining_seconds: self.remaining_seconds,
        }
    }

    /// Eliminate up to two still-visible wrong answers. The correct answer is
    /// never a candidate. Past the hint limit the call is a no-op.
    pub fn use_hint(&mut self, rng: &mut impl Rng) -> Result<HintUse, SessionStateError> {
        if self.phase != SessionPhase::Running {
            return Err(SessionStateError::NotRunning);
        }
        if self.hints_used >= self.rules.max_hints {
            return Ok(HintUse::Exhausted);
        }

        let correct = self.puzzle.correct_index();
        let mut candidates: Vec<usize> = (0..self.puzzle.answers.len())
            .filter(|i| Some(*i) != correct && !self.hidden_answers.contains(i))
            .collect();
        if candidates.is_empty() {
            return Ok(HintUse::Exhausted);
        }

        let take = ANSWERS_PER_HINT.min(candidates.len());
        let mut revealed = Vec::with_capacity(take);
        for _ in 0..take {
            let pick = rng.random_range(0..candidates.len());
            revealed.push(candidates.swap_remove(pick));
        }
        revealed.sort_unstable();
        self.hidden_answers.extend(revealed.iter().copied());
        self.hints_used += 1;
        Ok(HintUse::Revealed(revealed))
    }

    /// Running -> Finished. Computes the score exactly once; it is never
    /// mutated afterwards.
    pub fn select_answer(&mut self, answer: &str) -> Result<SessionOutcome, SessionStateError> {
        if self.phase != SessionPhase::Running {
            return Err(SessionStateError::NotRunning);
        }
        let correct = answer.trim() == self.puzzle.correct_answer.trim();
        let score = if correct {
            score_for(self.remaining_seconds, self.hints_used)
        } else {
            0
        };
        self.selected_answer = Some(answer.to_string());
        self.phase = SessionPhase::Finished;
        self.score = Some(score);
        Ok(SessionOutcome {
            correct,
            score,
            time_taken_seconds: self
                .rules
                .duration_seconds
                .saturating_sub(self.remaining_seconds),
        })
    }
}

// Clamped at zero: with the default limit of 2 hints the penalty can never
// outweigh the base score, but the hint limit is configurable.
fn score_for(remaining_seconds: u32, hints_used: u32) -> u32 {
    let earned = i64::from(BASE_SCORE) + i64::from(remaining_seconds) * i64::from(TIME_BONUS_PER_SECOND)
        - i64::from(hints_used) * i64::from(HINT_PENALTY);
    earned.max(0) as u32
}
