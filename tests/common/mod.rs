#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use xmtp_session::transport::{
    PublishRequest, PublishResponse, QueryRequest, QueryResponse, TransportResult,
};
use xmtp_session::{
    AuthToken, EncryptedPrivateKeyBundle, Envelope, MemoryTransport, PrivateKeyBundle,
    PrivateKeyBundleV1, SigningKey, Topic, Transport, TransportError, WalletKey,
};

/// A wallet that refuses to sign anything.
pub struct LockedWallet {
    pub address: String,
}

#[async_trait]
impl SigningKey for LockedWallet {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn sign(&self, _message: &[u8]) -> Result<Vec<u8>> {
        Err(anyhow!("wallet is locked"))
    }
}

pub fn garbage(topic: &Topic, timestamp_ns: u64) -> Envelope {
    Envelope::new(topic, timestamp_ns, b"\x08\x01corrupt bytes".to_vec())
}

/// Keys generated for `owner`, encrypted under `owner`'s wallet and filed on
/// `store_of`'s private-store topic.
pub async fn sealed_keys(
    owner: &WalletKey,
    store_of: &str,
    timestamp_ns: u64,
) -> Result<(PrivateKeyBundleV1, Envelope)> {
    let keys = PrivateKeyBundleV1::generate(owner).await?;
    let encrypted =
        EncryptedPrivateKeyBundle::encrypt(&PrivateKeyBundle::V1(keys.clone()), owner).await?;
    let envelope = Envelope::new(
        &Topic::UserPrivateStoreKeyBundle(store_of.to_string()),
        timestamp_ns,
        encrypted.to_bytes()?,
    );
    Ok((keys, envelope))
}

/// Relay that can fail queries and publishes independently.
pub struct SplitTransport {
    pub inner: MemoryTransport,
    pub fail_query: bool,
    pub fail_publish: bool,
}

#[async_trait]
impl Transport for SplitTransport {
    async fn query(&self, request: QueryRequest) -> TransportResult<QueryResponse> {
        if self.fail_query {
            return Err(TransportError::Unavailable("query".into()));
        }
        self.inner.query(request).await
    }

    async fn publish(
        &self,
        request: PublishRequest,
        auth_token: &AuthToken,
    ) -> TransportResult<PublishResponse> {
        if self.fail_publish {
            return Err(TransportError::Unavailable("publish".into()));
        }
        self.inner.publish(request, auth_token).await
    }
}
