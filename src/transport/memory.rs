//! In-process message relay.
//!
//! Cloned handles share one append-only store, so several clients can talk
//! through it. Publishes are checked the way a real relay would check them:
//! the bearer token must verify.
//!
//! Every accepted token and envelope is kept for the life of the store and
//! nothing is ever evicted. Meant for tests and demos, not a long-running
//! relay.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    PublishRequest, PublishResponse, QueryRequest, QueryResponse, SortDirection, Transport,
    TransportError, TransportResult,
};
use crate::auth::AuthToken;
use crate::envelope::Envelope;
use crate::topic::Topic;

#[derive(Default)]
struct Store {
    topics: HashMap<String, Vec<Envelope>>,
    tokens: Vec<AuthToken>,
    unavailable: bool,
}

#[derive(Clone, Default)]
pub struct MemoryTransport {
    store: Arc<Mutex<Store>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an envelope without authorization, as if written by some
    /// earlier or foreign session.
    pub async fn seed(&self, envelope: Envelope) {
        let mut store = self.store.lock().await;
        store
            .topics
            .entry(envelope.content_topic.clone())
            .or_default()
            .push(envelope);
    }

    pub async fn envelopes(&self, topic: &Topic) -> Vec<Envelope> {
        let store = self.store.lock().await;
        store
            .topics
            .get(&topic.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Every token accepted so far, oldest first.
    pub async fn published_tokens(&self) -> Vec<AuthToken> {
        self.store.lock().await.tokens.clone()
    }

    /// Make every subsequent call fail with [`TransportError::Unavailable`].
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.store.lock().await.unavailable = unavailable;
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn query(&self, request: QueryRequest) -> TransportResult<QueryResponse> {
        let store = self.store.lock().await;
        if store.unavailable {
            return Err(TransportError::Unavailable("query".to_string()));
        }

        let mut envelopes: Vec<Envelope> = request
            .content_topics
            .iter()
            .filter_map(|topic| store.topics.get(topic))
            .flatten()
            .filter(|envelope| {
                request
                    .start_time_ns
                    .map_or(true, |start| envelope.timestamp_ns >= start)
                    && request
                        .end_time_ns
                        .map_or(true, |end| envelope.timestamp_ns <= end)
            })
            .cloned()
            .collect();

        let paging_info = request.paging_info.unwrap_or_default();
        match paging_info.direction {
            SortDirection::Unspecified => {}
            SortDirection::Ascending => envelopes.sort_by_key(|envelope| envelope.timestamp_ns),
            SortDirection::Descending => {
                envelopes.sort_by_key(|envelope| std::cmp::Reverse(envelope.timestamp_ns))
            }
        }
        if let Some(limit) = paging_info.limit {
            envelopes.truncate(limit as usize);
        }

        Ok(QueryResponse {
            envelopes,
            paging_info: None,
        })
    }

    async fn publish(
        &self,
        request: PublishRequest,
        auth_token: &AuthToken,
    ) -> TransportResult<PublishResponse> {
        let mut store = self.store.lock().await;
        if store.unavailable {
            return Err(TransportError::Unavailable("publish".to_string()));
        }

        auth_token
            .verify()
            .map_err(|e| TransportError::Unauthorized(e.to_string()))?;
        store.tokens.push(auth_token.clone());

        for envelope in request.envelopes {
            store
                .topics
                .entry(envelope.content_topic.clone())
                .or_default()
                .push(envelope);
        }

        Ok(PublishResponse::default())
    }
}
