use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// One multiple-choice question. Immutable once decoded; `answers` always
/// holds four unique options including `correct_answer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer: String,
    pub category: String,
    pub difficulty: Difficulty,
}

impl Puzzle {
    /// Fixed puzzle used when the trivia source is unreachable. A failed fetch
    /// never fails the session.
    pub fn fallback() -> Self {
        Puzzle {
            question: "What is the largest planet in our solar system?".to_string(),
            answers: vec![
                "Jupiter".to_string(),
                "Saturn".to_string(),
                "Earth".to_string(),
                "Mars".to_string(),
            ],
            correct_answer: "Jupiter".to_string(),
            category: "Science".to_string(),
            difficulty: Difficulty::Medium,
        }
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.answers.iter().position(|a| a == &self.correct_answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Running,
    Finished,
}

/// Read-only view of the session state for shells and tests.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub remaining_seconds: u32,
    pub hints_used: u32,
    pub hidden_answers: Vec<usize>,
    pub selected_answer: Option<String>,
    pub score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    pub correct: bool,
    pub score: u32,
    pub time_taken_seconds: u32,
}

/// Result of a hint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintUse {
    /// Indices of the wrong answers that were just eliminated.
    Revealed(Vec<usize>),
    /// The hint limit is spent; the call was a no-op.
    Exhausted,
}
