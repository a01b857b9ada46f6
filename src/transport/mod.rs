//! Transport layer abstraction
//!
//! A transport carries query and publish requests to the message API. It
//! owns connection handling, timeouts and any retry policy. Publish
//! credentials travel with each request, so a transport holds no
//! per-session auth state.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use thiserror::Error;

use crate::auth::AuthToken;
use crate::envelope::Envelope;
use crate::topic::Topic;

pub mod http;
pub mod memory;

pub use http::ApiClient;
pub use memory::MemoryTransport;

/// Transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("HTTP status {0}: {1}")]
    Status(StatusCode, String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "SORT_DIRECTION_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "SORT_DIRECTION_ASCENDING")]
    Ascending,
    #[serde(rename = "SORT_DIRECTION_DESCENDING")]
    Descending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default)]
    pub direction: SortDirection,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub content_topics: Vec<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_ns: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time_ns: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging_info: Option<PagingInfo>,
}

impl QueryRequest {
    pub fn new(topics: &[Topic]) -> Self {
        Self {
            content_topics: topics.iter().map(Topic::to_string).collect(),
            ..Default::default()
        }
    }

    pub fn with_paging(mut self, paging_info: PagingInfo) -> Self {
        self.paging_info = Some(paging_info);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub envelopes: Vec<Envelope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging_info: Option<PagingInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub envelopes: Vec<Envelope>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {}

/// Abstract transport trait
///
/// Envelope order in a query response is whatever the service returns and
/// need not be stable across calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn query(&self, request: QueryRequest) -> TransportResult<QueryResponse>;

    /// Publish a batch, authorized by `auth_token` for this call only.
    async fn publish(
        &self,
        request: PublishRequest,
        auth_token: &AuthToken,
    ) -> TransportResult<PublishResponse>;
}
