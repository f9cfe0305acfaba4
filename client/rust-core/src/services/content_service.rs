use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tokio::sync::Mutex;

use crate::clients::ContentApi;
use crate::models::content::{FunFact, TodayContent};

/// Fetches and caches the day's home content. History and the fun fact load
/// concurrently; either source failing degrades to its fallback, never to an
/// error.
pub struct ContentService {
    content: Arc<dyn ContentApi>,
    cache: Mutex<Option<TodayContent>>,
}

impl ContentService {
    pub fn new(content: Arc<dyn ContentApi>) -> Self {
        Self {
            content,
            cache: Mutex::new(None),
        }
    }

    /// The day's content, cached per calendar date.
    // TODO: persist the day's content so a same-day relaunch skips the refetch
    pub async fn today(&self, date: NaiveDate) -> TodayContent {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.date == date {
                return cached.clone();
            }
        }

        let (history, fact) = futures::join!(
            self.content.fetch_history_events(date.month(), date.day()),
            self.content.fetch_fun_fact(),
        );

        let history = history.unwrap_or_else(|e| {
            tracing::warn!("History fetch failed, showing none: {}", e);
            Vec::new()
        });
        let fun_fact = fact.unwrap_or_else(|e| {
            tracing::warn!("Fun fact fetch failed, using the default: {}", e);
            FunFact::fallback()
        });

        let content = TodayContent {
            date,
            history,
            fun_fact,
        };
        *cache = Some(content.clone());
        content
    }

    /// Drop the cache and refetch (pull-to-refresh).
    pub async fn refresh(&self, date: NaiveDate) -> TodayContent {
        self.cache.lock().await.take();
        self.today(date).await
    }
}
