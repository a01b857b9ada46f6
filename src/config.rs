use serde::{Deserialize, Serialize};
use url::Url;

/// Which message network the HTTP transport talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Production,
    Local,
}

impl Environment {
    /// Host (and port, for local nodes) of the message API.
    pub fn host(&self) -> &'static str {
        match self {
            Environment::Dev => "dev.xmtp.network",
            Environment::Production => "production.xmtp.network",
            Environment::Local => "localhost:5555",
        }
    }
}

/// Settings for the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiOptions {
    pub env: Environment,
    pub is_secure: bool,
    /// Sent as `X-App-Version` when set.
    pub app_version: Option<String>,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            env: Environment::default(),
            is_secure: true,
            app_version: None,
        }
    }
}

impl ApiOptions {
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let scheme = if self.is_secure { "https" } else { "http" };
        Url::parse(&format!("{}://{}", scheme, self.env.host()))
    }
}

/// Options for [`Client::create`](crate::Client::create).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub api: ApiOptions,
    /// Write a freshly generated key bundle back to the account's private
    /// store before bootstrap returns. When `false` a generated identity only
    /// lives as long as the session unless the caller persists it with
    /// [`Client::persist_private_keys`](crate::Client::persist_private_keys).
    pub persist_generated_keys: bool,
}
