//! In-memory store of received quotes.
//!
//! Bounded: once `capacity` quotes are held, each new one evicts the oldest.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sparkle_core::submission::QuoteRequest;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A quote as kept by the server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuote {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub quote: QuoteRequest,
}

#[derive(Debug)]
pub struct QuoteInbox {
    quotes: RwLock<VecDeque<StoredQuote>>,
    capacity: usize,
}

impl QuoteInbox {
    /// A zero capacity is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            quotes: RwLock::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store `quote`, returning the evicted entry if the inbox was full.
    pub async fn push(&self, quote: StoredQuote) -> Option<StoredQuote> {
        let mut quotes = self.quotes.write().await;
        let evicted = if quotes.len() >= self.capacity {
            quotes.pop_front()
        } else {
            None
        };
        quotes.push_back(quote);
        evicted
    }

    /// All quotes, newest first.
    pub async fn list(&self) -> Vec<StoredQuote> {
        let quotes = self.quotes.read().await;
        quotes.iter().rev().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.quotes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(name: &str) -> StoredQuote {
        let form = sparkle_core::form::FormSnapshot {
            name: name.into(),
            ..Default::default()
        };
        StoredQuote {
            id: Uuid::now_v7(),
            received_at: Utc::now(),
            quote: QuoteRequest::from_form(&form, None, Utc::now(), None),
        }
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let inbox = QuoteInbox::with_capacity(10);
        assert!(inbox.is_empty().await);

        inbox.push(stored("first")).await;
        inbox.push(stored("second")).await;

        let names: Vec<_> = inbox.list().await.into_iter().map(|q| q.quote.name).collect();
        assert_eq!(names, vec!["second", "first"]);
        assert_eq!(inbox.len().await, 2);
    }

    #[tokio::test]
    async fn oldest_quote_is_evicted_at_capacity() {
        let inbox = QuoteInbox::with_capacity(2);

        assert!(inbox.push(stored("first")).await.is_none());
        assert!(inbox.push(stored("second")).await.is_none());
        let evicted = inbox.push(stored("third")).await.unwrap();
        assert_eq!(evicted.quote.name, "first");

        let names: Vec<_> = inbox.list().await.into_iter().map(|q| q.quote.name).collect();
        assert_eq!(names, vec!["third", "second"]);
        assert_eq!(inbox.len().await, 2);
    }

    #[test]
    fn zero_capacity_holds_one() {
        assert_eq!(QuoteInbox::with_capacity(0).capacity(), 1);
    }
}
