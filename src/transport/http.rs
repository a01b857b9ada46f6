use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::{
    PublishRequest, PublishResponse, QueryRequest, QueryResponse, Transport, TransportError,
    TransportResult,
};
use crate::auth::AuthToken;
use crate::config::ApiOptions;

const QUERY_PATH: &str = "message/v1/query";
const PUBLISH_PATH: &str = "message/v1/publish";
const CLIENT_VERSION: &str = concat!("xmtp-rs/", env!("CARGO_PKG_VERSION"));

/// JSON-over-HTTP client for the message API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(options: &ApiOptions) -> TransportResult<Self> {
        Self::with_base_url(&options.base_url()?, options.app_version.as_deref())
    }

    pub fn with_base_url(remote: &Url, app_version: Option<&str>) -> TransportResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        default_headers.insert("X-Client-Version", HeaderValue::from_static(CLIENT_VERSION));
        if let Some(app_version) = app_version {
            let value = HeaderValue::from_str(app_version)
                .map_err(|e| TransportError::InvalidHeader(e.to_string()))?;
            default_headers.insert("X-App-Version", value);
        }
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> TransportResult<Url> {
        Ok(self.remote.join(path)?)
    }

    async fn post<B, R>(&self, path: &str, body: &B, auth_token: Option<&AuthToken>) -> TransportResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(self.endpoint(path)?).json(body);
        if let Some(token) = auth_token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(serde_json::from_slice(&response.bytes().await?)?)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(TransportError::Unauthorized(response.text().await?))
        } else {
            Err(TransportError::Status(status, response.text().await?))
        }
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn query(&self, request: QueryRequest) -> TransportResult<QueryResponse> {
        tracing::debug!("Querying {} topic(s)", request.content_topics.len());
        self.post(QUERY_PATH, &request, None).await
    }

    async fn publish(
        &self,
        request: PublishRequest,
        auth_token: &AuthToken,
    ) -> TransportResult<PublishResponse> {
        tracing::debug!("Publishing {} envelope(s)", request.envelopes.len());
        self.post(PUBLISH_PATH, &request, Some(auth_token)).await
    }
}
