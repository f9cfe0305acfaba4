use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use percent_encoding::percent_decode_str;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use super::{ClientError, ClientResult, ContentApi};
use crate::config::Config;
use crate::models::content::{FunFact, HistoryEvent};
use crate::models::puzzle::{Difficulty, Puzzle};

const ANSWER_COUNT: usize = 4;
const HISTORY_EVENT_LIMIT: usize = 3;

pub struct HttpContentClient {
    http: reqwest::Client,
    trivia_url: String,
    history_url: String,
    facts_url: String,
    numbers_url: String,
    difficulty: String,
}

impl HttpContentClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            trivia_url: config.trivia_api_url.clone(),
            history_url: config.history_api_url.clone(),
            facts_url: config.facts_api_url.clone(),
            numbers_url: config.numbers_api_url.clone(),
            difficulty: config.puzzle_difficulty.clone(),
        }
    }

    async fn fetch_useless_fact(&self) -> ClientResult<FunFact> {
        let response = self
            .http
            .get(&self.facts_url)
            .query(&[("language", "en")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(response.json::<FunFact>().await?)
    }

    async fn fetch_numbers_fact(&self) -> ClientResult<FunFact> {
        let today = Utc::now().date_naive();
        let url = format!(
            "{}/{}/{}/date?json",
            self.numbers_url,
            today.month(),
            today.day()
        );
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        let body: NumbersFact = response.json().await?;
        Ok(FunFact {
            text: body.text,
            source: "Numbers API".to_string(),
            source_url: self.numbers_url.clone(),
        })
    }
}

#[async_trait]
impl ContentApi for HttpContentClient {
    async fn fetch_puzzle(&self) -> ClientResult<Puzzle> {
        // encode=url3986 keeps HTML entities out of questions; we decode below.
        let url = format!(
            "{}?amount=1&difficulty={}&type=multiple&encode=url3986",
            self.trivia_url, self.difficulty
        );
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        let body: TriviaResponse = response.json().await?;
        let puzzle = decode_puzzle(body, &mut rand::rng())?;
        tracing::debug!(
            "Fetched puzzle: category={}, difficulty={}",
            puzzle.category,
            puzzle.difficulty.as_str()
        );
        Ok(puzzle)
    }

    async fn fetch_history_events(&self, month: u32, day: u32) -> ClientResult<Vec<HistoryEvent>> {
        let url = format!("{}/date/{}/{}", self.history_url, month, day);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        let body: HistoryResponse = response.json().await?;
        Ok(trim_history(body))
    }

    async fn fetch_fun_fact(&self) -> ClientResult<FunFact> {
        match self.fetch_useless_fact().await {
            Ok(fact) => Ok(fact),
            Err(e) => {
                tracing::warn!("Primary fact source failed, trying numbers API: {}", e);
                self.fetch_numbers_fact().await
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TriviaResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<TriviaQuestion>,
}

#[derive(Debug, Deserialize)]
struct TriviaQuestion {
    category: String,
    difficulty: String,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    data: HistoryData,
}

#[derive(Debug, Deserialize)]
struct HistoryData {
    #[serde(rename = "Events", default)]
    events: Vec<HistoryEvent>,
}

#[derive(Debug, Deserialize)]
struct NumbersFact {
    text: String,
}

fn trim_history(body: HistoryResponse) -> Vec<HistoryEvent> {
    body.data
        .events
        .into_iter()
        .take(HISTORY_EVENT_LIMIT)
        .collect()
}

fn decode_puzzle(body: TriviaResponse, rng: &mut impl Rng) -> ClientResult<Puzzle> {
    if body.response_code != 0 {
        return Err(ClientError::Decode(format!(
            "trivia API response_code {}",
            body.response_code
        )));
    }
    let question = body
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::Decode("trivia API returned no results".to_string()))?;

    let correct_answer = decode_component(&question.correct_answer)?;
    let mut answers = Vec::with_capacity(ANSWER_COUNT);
    answers.push(correct_answer.clone());
    for raw in &question.incorrect_answers {
        answers.push(decode_component(raw)?);
    }
    if answers.len() != ANSWER_COUNT {
        return Err(ClientError::Decode(format!(
            "expected {} answers, got {}",
            ANSWER_COUNT,
            answers.len()
        )));
    }
    if answers.iter().collect::<HashSet<_>>().len() != ANSWER_COUNT {
        return Err(ClientError::Decode("duplicate answers".to_string()));
    }
    answers.shuffle(rng);

    let difficulty = Difficulty::parse(&question.difficulty).ok_or_else(|| {
        ClientError::Decode(format!("unknown difficulty {:?}", question.difficulty))
    })?;

    Ok(Puzzle {
        question: decode_component(&question.question)?,
        answers,
        correct_answer,
        category: decode_component(&question.category)?,
        difficulty,
    })
}

fn decode_component(raw: &str) -> ClientResult<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ClientError::Decode(format!("invalid percent-encoding: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn trivia_fixture() -> TriviaResponse {
        serde_json::from_str(
            r#"{
                "response_code": 0,
                "results": [{
                    "category": "Science%3A%20Computers",
                    "type": "multiple",
                    "difficulty": "medium",
                    "question": "What%20does%20CPU%20stand%20for%3F",
                    "correct_answer": "Central%20Processing%20Unit",
                    "incorrect_answers": [
                        "Central%20Process%20Unit",
                        "Computer%20Personal%20Unit",
                        "Central%20Processor%20Unit"
                    ]
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn decodes_percent_encoded_puzzle() {
        let mut rng = StdRng::seed_from_u64(7);
        let puzzle = decode_puzzle(trivia_fixture(), &mut rng).unwrap();
        assert_eq!(puzzle.question, "What does CPU stand for?");
        assert_eq!(puzzle.correct_answer, "Central Processing Unit");
        assert_eq!(puzzle.category, "Science: Computers");
        assert_eq!(puzzle.difficulty, Difficulty::Medium);
        assert_eq!(puzzle.answers.len(), 4);
        assert!(puzzle.correct_index().is_some());
    }

    #[test]
    fn rejects_error_response_code() {
        let mut body = trivia_fixture();
        body.response_code = 1;
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            decode_puzzle(body, &mut rng),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn rejects_wrong_answer_count() {
        let mut body = trivia_fixture();
        body.results[0].incorrect_answers.pop();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            decode_puzzle(body, &mut rng),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn rejects_duplicate_answers() {
        let mut body = trivia_fixture();
        body.results[0].incorrect_answers[0] = body.results[0].correct_answer.clone();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            decode_puzzle(body, &mut rng),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn history_keeps_first_three_events() {
        let body: HistoryResponse = serde_json::from_str(
            r#"{
                "date": "August 6",
                "data": {
                    "Events": [
                        {"year": "1926", "text": "first"},
                        {"year": "1945", "text": "second"},
                        {"year": "1969", "text": "third"},
                        {"year": "1991", "text": "fourth"}
                    ]
                }
            }"#,
        )
        .unwrap();
        let events = trim_history(body);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].year, "1926");
        assert_eq!(events[2].text, "third");
    }
}
