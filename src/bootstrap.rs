//! Identity bootstrap: recover the account's private key bundle from its
//! private store, or generate a new one.
//!
//! The private-store topic is an append-only history that any session may
//! have written to, so it can hold stale, foreign or corrupted records. Each
//! candidate is tried in the order the transport returns it and the first one
//! that decrypts under the account's wallet wins. Nothing short of a failure
//! to generate keys stops a session from getting an identity.

use crate::client::publish_with_keys;
use crate::config::ClientOptions;
use crate::encrypted::EncryptedPrivateKeyBundle;
use crate::envelope::{now_ns, Envelope};
use crate::error::{ClientError, KeyError, Result};
use crate::keys::{PrivateKeyBundle, PrivateKeyBundleV1};
use crate::signer::SigningKey;
use crate::topic::Topic;
use crate::transport::{QueryRequest, Transport, TransportError};

/// Whether the session's identity already existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Decrypted from the account's private store.
    Recovered,
    /// Freshly generated. Unless persisted it diverges from any identity
    /// other sessions publish.
    Generated,
}

#[derive(Debug, Clone)]
pub struct ResolvedIdentity {
    pub keys: PrivateKeyBundleV1,
    pub source: IdentitySource,
}

/// Load the account's keys from its private store, generating new ones if
/// none can be recovered.
///
/// Only a failure to generate keys is an error. Persisting a generated
/// identity is best effort and is skipped when the store could not be read.
pub async fn load_or_create_keys<T>(
    account: &dyn SigningKey,
    transport: &T,
    options: &ClientOptions,
) -> Result<ResolvedIdentity>
where
    T: Transport + ?Sized,
{
    let store_readable = match load_private_keys(account, transport).await {
        Ok(Some(keys)) => {
            tracing::info!("Recovered identity for {}", account.address());
            return Ok(ResolvedIdentity {
                keys,
                source: IdentitySource::Recovered,
            });
        }
        Ok(None) => true,
        Err(e) => {
            tracing::warn!("Private key store unavailable, generating new keys: {}", e);
            false
        }
    };

    let keys = PrivateKeyBundleV1::generate(account)
        .await
        .map_err(ClientError::Identity)?;
    tracing::info!("Generated new identity for {}", account.address());

    // An unread store may already hold this account's identity.
    if options.persist_generated_keys {
        if !store_readable {
            tracing::warn!(
                "Not persisting generated keys for {}: private key store could not be read",
                account.address()
            );
        } else if let Err(e) = store_private_keys(account, &keys, transport).await {
            tracing::warn!("Failed to persist generated keys for {}: {}", account.address(), e);
        }
    }

    Ok(ResolvedIdentity {
        keys,
        source: IdentitySource::Generated,
    })
}

/// Scan the private store for the first bundle `account` can decrypt.
///
/// Undecodable or undecryptable records are logged and skipped; only the
/// query itself can fail.
pub async fn load_private_keys<T>(
    account: &dyn SigningKey,
    transport: &T,
) -> Result<Option<PrivateKeyBundleV1>, TransportError>
where
    T: Transport + ?Sized,
{
    let topic = Topic::UserPrivateStoreKeyBundle(account.address());
    let response = transport.query(QueryRequest::new(&[topic.clone()])).await?;

    for envelope in response.envelopes {
        match decrypt_envelope(&envelope, account).await {
            Ok(keys) => return Ok(Some(keys)),
            Err(e) => {
                tracing::warn!("Error decoding encrypted private key bundle on {}: {}", topic, e);
            }
        }
    }

    Ok(None)
}

async fn decrypt_envelope(
    envelope: &Envelope,
    account: &dyn SigningKey,
) -> Result<PrivateKeyBundleV1, KeyError> {
    let encrypted = EncryptedPrivateKeyBundle::from_bytes(&envelope.message)?;
    Ok(encrypted.decrypted(account).await?.into_v1())
}

/// Encrypt `keys` for `account` and publish them to its private store.
pub async fn store_private_keys<T>(
    account: &dyn SigningKey,
    keys: &PrivateKeyBundleV1,
    transport: &T,
) -> Result<()>
where
    T: Transport + ?Sized,
{
    let address = account.address();
    let encrypted = EncryptedPrivateKeyBundle::encrypt(&PrivateKeyBundle::V1(keys.clone()), account)
        .await
        .map_err(ClientError::Identity)?;
    let envelope = Envelope::new(
        &Topic::UserPrivateStoreKeyBundle(address.clone()),
        now_ns().map_err(|_| ClientError::Clock)?,
        encrypted.to_bytes().map_err(ClientError::Codec)?,
    );

    publish_with_keys(transport, &address, keys, vec![envelope]).await?;
    tracing::info!("Stored private keys for {}", address);
    Ok(())
}
