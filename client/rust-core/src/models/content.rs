use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One "this day in history" entry. Years arrive as strings ("1969", "300 BC").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub year: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunFact {
    pub text: String,
    pub source: String,
    #[serde(default)]
    pub source_url: String,
}

impl FunFact {
    /// Last-resort fact when every remote source fails.
    pub fn fallback() -> Self {
        FunFact {
            text: "Did you know? Octopuses have three hearts and blue blood!".to_string(),
            source: "Default".to_string(),
            source_url: String::new(),
        }
    }
}

/// The day's home-screen content, cached per calendar date.
#[derive(Debug, Clone)]
pub struct TodayContent {
    pub date: NaiveDate,
    pub history: Vec<HistoryEvent>,
    pub fun_fact: FunFact,
}
