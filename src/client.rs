use crate::auth::AuthorizedIdentity;
use crate::bootstrap::{self, IdentitySource, ResolvedIdentity};
use crate::config::ClientOptions;
use crate::contact::ContactBundle;
use crate::envelope::{now_ns, Envelope};
use crate::error::{ClientError, KeyError, Result};
use crate::keys::{PrivateKeyBundleV1, PublicKeyBundle};
use crate::signer::SigningKey;
use crate::topic::Topic;
use crate::transport::{
    ApiClient, PagingInfo, PublishRequest, PublishResponse, QueryRequest, QueryResponse, Transport,
};

/// A messaging session for one account.
///
/// Owns the account's private key bundle and the transport handle for its
/// whole lifetime; both go away when the client is dropped.
pub struct Client<T = ApiClient> {
    address: String,
    keys: PrivateKeyBundleV1,
    source: IdentitySource,
    transport: T,
}

impl Client<ApiClient> {
    /// Connect to the configured network and bootstrap the account's identity
    pub async fn create(account: &dyn SigningKey, options: ClientOptions) -> Result<Self> {
        let transport = ApiClient::new(&options.api)?;
        Self::create_with_transport(account, transport, options).await
    }
}

impl<T: Transport> Client<T> {
    /// Bootstrap the account's identity over an existing transport
    pub async fn create_with_transport(
        account: &dyn SigningKey,
        transport: T,
        options: ClientOptions,
    ) -> Result<Self> {
        let resolved = bootstrap::load_or_create_keys(account, &transport, &options).await?;
        Ok(Self::from_resolved(account.address(), resolved, transport))
    }

    pub fn from_resolved(address: impl Into<String>, resolved: ResolvedIdentity, transport: T) -> Self {
        Self {
            address: address.into(),
            keys: resolved.keys,
            source: resolved.source,
            transport,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn keys(&self) -> &PrivateKeyBundleV1 {
        &self.keys
    }

    /// Whether this session recovered an existing identity or made a new one
    pub fn identity_source(&self) -> IdentitySource {
        self.source
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn public_key_bundle(&self) -> Result<PublicKeyBundle> {
        self.keys.to_public_key_bundle().map_err(ClientError::Codec)
    }

    /// Publish envelopes, authorized by a token minted for this call alone
    pub async fn publish(&self, envelopes: Vec<Envelope>) -> Result<PublishResponse> {
        publish_with_keys(&self.transport, &self.address, &self.keys, envelopes).await
    }

    pub async fn query(&self, topics: &[Topic], paging: Option<PagingInfo>) -> Result<QueryResponse> {
        let mut request = QueryRequest::new(topics);
        request.paging_info = paging;
        Ok(self.transport.query(request).await?)
    }

    /// Announce this account's public keys on its contact topic
    pub async fn publish_user_contact(&self) -> Result<()> {
        let contact = ContactBundle::new(self.public_key_bundle()?);
        let envelope = Envelope::new(
            &Topic::Contact(self.address.clone()),
            now_ns().map_err(|_| ClientError::Clock)?,
            contact.to_bytes().map_err(ClientError::Codec)?,
        );

        self.publish(vec![envelope]).await?;
        Ok(())
    }

    /// Look up a peer's published contact bundle.
    ///
    /// Returns the first record on the peer's contact topic that decodes, or
    /// `None` if nothing does.
    pub async fn get_user_contact(&self, peer_address: &str) -> Result<Option<ContactBundle>> {
        let topic = Topic::Contact(peer_address.to_string());
        let response = self.transport.query(QueryRequest::new(&[topic.clone()])).await?;

        for envelope in response.envelopes.iter() {
            match ContactBundle::from_envelope(envelope) {
                Ok(contact) => return Ok(Some(contact)),
                Err(e) => tracing::warn!("Skipping undecodable contact on {}: {}", topic, e),
            }
        }

        Ok(None)
    }

    /// Encrypt this session's keys for `account` and write them to its
    /// private store, so later sessions recover the same identity
    pub async fn persist_private_keys(&self, account: &dyn SigningKey) -> Result<()> {
        if account.address() != self.address {
            return Err(ClientError::Identity(KeyError::InvalidPublicKey(format!(
                "{} does not own this session",
                account.address()
            ))));
        }
        bootstrap::store_private_keys(account, &self.keys, &self.transport).await
    }
}

/// Mint a token from `keys` and publish `envelopes` with it.
pub(crate) async fn publish_with_keys<T>(
    transport: &T,
    address: &str,
    keys: &PrivateKeyBundleV1,
    envelopes: Vec<Envelope>,
) -> Result<PublishResponse>
where
    T: Transport + ?Sized,
{
    let auth_token = AuthorizedIdentity::new(address, keys)
        .create_auth_token()
        .map_err(ClientError::Identity)?;

    tracing::debug!("Publishing {} envelope(s) for {}", envelopes.len(), address);
    Ok(transport
        .publish(PublishRequest { envelopes }, &auth_token)
        .await?)
}
