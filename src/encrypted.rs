use pubky_common::crypto::{decrypt, encrypt};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

use crate::crypto::{derive_store_secret, random_bytes};
use crate::error::KeyError;
use crate::keys::PrivateKeyBundle;
use crate::signer::{enable_identity_text, SigningKey};

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPrivateKeyBundleV1 {
    /// Random bytes the wallet signs to unlock the ciphertext.
    #[serde_as(as = "Base64")]
    pub wallet_pre_key: Vec<u8>,
    #[serde_as(as = "Base64")]
    pub ciphertext: Vec<u8>,
}

/// A private key bundle as kept in the account's private store. Only the
/// wallet that encrypted it can open it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptedPrivateKeyBundle {
    #[serde(rename = "v1")]
    V1(EncryptedPrivateKeyBundleV1),
}

impl EncryptedPrivateKeyBundle {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Encrypt `bundle` so that only `wallet` can decrypt it.
    pub async fn encrypt(
        bundle: &PrivateKeyBundle,
        wallet: &dyn SigningKey,
    ) -> Result<Self, KeyError> {
        let wallet_pre_key = random_bytes::<32>().to_vec();
        let secret = store_secret(&wallet_pre_key, wallet).await?;
        let plaintext = serde_json::to_vec(bundle)?;

        Ok(Self::V1(EncryptedPrivateKeyBundleV1 {
            wallet_pre_key,
            ciphertext: encrypt(&plaintext, &secret),
        }))
    }

    /// Decrypt with `wallet` and check the result really belongs to it.
    ///
    /// Fails for ciphertext written by another wallet, for corrupted
    /// ciphertext, and for bundles whose identity key the wallet never
    /// attested.
    pub async fn decrypted(&self, wallet: &dyn SigningKey) -> Result<PrivateKeyBundle, KeyError> {
        let EncryptedPrivateKeyBundle::V1(v1) = self;

        let secret = store_secret(&v1.wallet_pre_key, wallet).await?;
        let plaintext =
            decrypt(&v1.ciphertext, &secret).map_err(|e| KeyError::Decrypt(e.to_string()))?;
        let bundle: PrivateKeyBundle = serde_json::from_slice(&plaintext)?;

        let PrivateKeyBundle::V1(keys) = &bundle;
        keys.to_public_key_bundle()?.verify(&wallet.address())?;

        Ok(bundle)
    }
}

async fn store_secret(wallet_pre_key: &[u8], wallet: &dyn SigningKey) -> Result<[u8; 32], KeyError> {
    let text = enable_identity_text(wallet_pre_key);
    let signature = wallet
        .sign(text.as_bytes())
        .await
        .map_err(KeyError::Signer)?;
    Ok(derive_store_secret(&signature))
}
