//! Identity key material.
//!
//! A [`PrivateKeyBundleV1`] holds the identity key, attested by the account's
//! wallet, plus one or more pre-keys signed by the identity key. Its
//! [`PublicKeyBundle`] projection is what gets published as a contact.

use std::fmt;

use ed25519_dalek::{Verifier, VerifyingKey};
use pkarr::Keypair;
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as, DisplayFromStr};

use crate::crypto;
use crate::envelope::now_ns;
use crate::error::KeyError;
use crate::signer::{create_identity_text, to_signature, verify_wallet_signature, SigningKey};

/// Size of an Ed25519 public or secret key in bytes
pub const KEY_SIZE: usize = 32;

/// A public key before anyone has signed it.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedPublicKey {
    #[serde_as(as = "DisplayFromStr")]
    pub created_ns: u64,
    #[serde_as(as = "Base64")]
    pub key_bytes: Vec<u8>,
}

impl UnsignedPublicKey {
    /// Canonical bytes covered by a signature: `created_ns` (big endian) then the key.
    pub fn bytes_to_sign(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.key_bytes.len());
        bytes.extend_from_slice(&self.created_ns.to_be_bytes());
        bytes.extend_from_slice(&self.key_bytes);
        bytes
    }

    fn verifying_key(&self) -> Result<VerifyingKey, KeyError> {
        let bytes: [u8; KEY_SIZE] =
            self.key_bytes
                .as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: self.key_bytes.len(),
                })?;
        VerifyingKey::from_bytes(&bytes).map_err(|e| KeyError::InvalidPublicKey(e.to_string()))
    }
}

/// A public key together with the signature that vouches for it.
///
/// Identity keys are signed by the wallet over [`create_identity_text`];
/// pre-keys are signed directly by the identity key.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPublicKey {
    pub key: UnsignedPublicKey,
    #[serde_as(as = "Base64")]
    pub signature: Vec<u8>,
}

impl SignedPublicKey {
    pub fn key_bytes(&self) -> &[u8] {
        &self.key.key_bytes
    }

    /// Check the wallet at `address` attested this key as its identity.
    pub fn verify_wallet_attestation(&self, address: &str) -> Result<(), KeyError> {
        let text = create_identity_text(&self.key.bytes_to_sign());
        verify_wallet_signature(address, text.as_bytes(), &self.signature)
    }

    /// Check this key was signed by `signer`.
    pub fn verify_signed_by(&self, signer: &SignedPublicKey) -> Result<(), KeyError> {
        let signature = to_signature(&self.signature)?;
        signer
            .key
            .verifying_key()?
            .verify(&self.key.bytes_to_sign(), &signature)
            .map_err(|e| KeyError::BadSignature(e.to_string()))
    }

    /// Verify `signature` over `message` with this key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), KeyError> {
        let signature = to_signature(signature)?;
        self.key
            .verifying_key()?
            .verify(message, &signature)
            .map_err(|e| KeyError::BadSignature(e.to_string()))
    }
}

/// An Ed25519 secret key and its signed public half.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateKey {
    #[serde_as(as = "DisplayFromStr")]
    pub created_ns: u64,
    #[serde_as(as = "Base64")]
    secret: Vec<u8>,
    pub public_key: SignedPublicKey,
}

impl PrivateKey {
    fn keypair(&self) -> Result<Keypair, KeyError> {
        let secret: [u8; KEY_SIZE] =
            self.secret
                .as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: self.secret.len(),
                })?;
        Ok(Keypair::from_secret_key(&secret))
    }

    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        Ok(self.keypair()?.sign(message).to_bytes().to_vec())
    }

    /// True if `public` is the public half of this key.
    pub fn matches(&self, public: &SignedPublicKey) -> bool {
        self.keypair()
            .map(|keypair| keypair.public_key().as_bytes().as_slice() == public.key_bytes())
            .unwrap_or(false)
    }

    fn secret_bytes(&self) -> Result<[u8; KEY_SIZE], KeyError> {
        Ok(self.keypair()?.secret_key())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("created_ns", &self.created_ns)
            .field("public_key", &hex::encode(self.public_key.key_bytes()))
            .finish_non_exhaustive()
    }
}

fn fresh_key(created_ns: u64) -> (Keypair, UnsignedPublicKey) {
    let keypair = Keypair::random();
    let unsigned = UnsignedPublicKey {
        created_ns,
        key_bytes: keypair.public_key().as_bytes().to_vec(),
    };
    (keypair, unsigned)
}

/// Version 1 private key bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateKeyBundleV1 {
    pub identity_key: PrivateKey,
    pub pre_keys: Vec<PrivateKey>,
}

impl PrivateKeyBundleV1 {
    /// Create fresh identity and pre-keys, with the identity attested by `wallet`.
    pub async fn generate(wallet: &dyn SigningKey) -> Result<Self, KeyError> {
        let created_ns = now_ns().map_err(|_| KeyError::Clock)?;

        let (identity, unsigned_identity) = fresh_key(created_ns);
        let text = create_identity_text(&unsigned_identity.bytes_to_sign());
        let attestation = wallet
            .sign(text.as_bytes())
            .await
            .map_err(KeyError::Signer)?;
        let identity_key = PrivateKey {
            created_ns,
            secret: identity.secret_key().to_vec(),
            public_key: SignedPublicKey {
                key: unsigned_identity,
                signature: attestation,
            },
        };

        let (pre_key, unsigned_pre_key) = fresh_key(created_ns);
        let signature = identity_key.sign(&unsigned_pre_key.bytes_to_sign())?;
        let pre_key = PrivateKey {
            created_ns,
            secret: pre_key.secret_key().to_vec(),
            public_key: SignedPublicKey {
                key: unsigned_pre_key,
                signature,
            },
        };

        Ok(Self {
            identity_key,
            pre_keys: vec![pre_key],
        })
    }

    pub fn to_public_key_bundle(&self) -> Result<PublicKeyBundle, KeyError> {
        let pre_key = self.pre_keys.first().ok_or(KeyError::MissingPreKey)?;
        Ok(PublicKeyBundle {
            identity_key: self.identity_key.public_key.clone(),
            pre_key: pre_key.public_key.clone(),
        })
    }

    /// X25519 secret between our current pre-key and a contact's pre-key.
    pub fn shared_secret(&self, peer: &PublicKeyBundle) -> Result<[u8; 32], KeyError> {
        let pre_key = self.pre_keys.first().ok_or(KeyError::MissingPreKey)?;
        crypto::shared_secret(&pre_key.secret_bytes()?, peer.pre_key.key_bytes())
    }
}

/// Versioned private key bundle as stored in the private store.
///
/// Only version 1 is understood; records of any other version fail to
/// decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivateKeyBundle {
    #[serde(rename = "v1")]
    V1(PrivateKeyBundleV1),
}

impl PrivateKeyBundle {
    pub fn into_v1(self) -> PrivateKeyBundleV1 {
        match self {
            PrivateKeyBundle::V1(v1) => v1,
        }
    }
}

/// Public halves of a private key bundle; safe to broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyBundle {
    pub identity_key: SignedPublicKey,
    pub pre_key: SignedPublicKey,
}

impl PublicKeyBundle {
    /// Check the chain of trust: wallet at `address` attested the identity
    /// key, and the identity key signed the pre-key.
    pub fn verify(&self, address: &str) -> Result<(), KeyError> {
        self.identity_key.verify_wallet_attestation(address)?;
        self.pre_key.verify_signed_by(&self.identity_key)
    }
}
