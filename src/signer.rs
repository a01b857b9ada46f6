use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bip39::{Language, Mnemonic};
use ed25519_dalek::Signature;
use pkarr::{Keypair, PublicKey};
use pubky_common::recovery_file;

use crate::error::KeyError;

/// Size of a wallet signature in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// An account's signing capability: something that can sign arbitrary bytes
/// on behalf of a stable address.
///
/// Addresses are z-base32 encoded Ed25519 public keys, so any signature the
/// capability produces can be checked with [`verify_wallet_signature`].
#[async_trait]
pub trait SigningKey: Send + Sync {
    fn address(&self) -> String;

    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

/// A local wallet backed by a pkarr keypair.
pub struct WalletKey {
    keypair: Keypair,
}

impl WalletKey {
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Generate a throwaway wallet
    pub fn random() -> Self {
        Self::from_keypair(Keypair::random())
    }

    /// Load a wallet from a pkarr recovery file
    ///
    /// # Parameters
    /// - `recovery_file_bytes`: The bytes of the .pkarr recovery file
    /// - `passphrase`: Optional passphrase to decrypt the file (defaults to empty string)
    pub fn from_recovery_file(recovery_file_bytes: &[u8], passphrase: Option<&str>) -> Result<Self> {
        let keypair =
            recovery_file::decrypt_recovery_file(recovery_file_bytes, passphrase.unwrap_or(""))
                .map_err(|e| anyhow!("Failed to decrypt recovery file: {:?}", e))?;

        Ok(Self::from_keypair(keypair))
    }

    /// Load a wallet from a BIP39 mnemonic
    ///
    /// The first 32 bytes of the seed become the Ed25519 secret key, so the
    /// same phrase and passphrase always yield the same address.
    pub fn from_recovery_phrase(
        mnemonic_phrase: &str,
        passphrase: Option<&str>,
        language: Option<Language>,
    ) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in(language.unwrap_or(Language::English), mnemonic_phrase)
            .map_err(|e| anyhow!("Invalid mnemonic phrase: {}", e))?;

        let seed = mnemonic.to_seed(passphrase.unwrap_or(""));
        let secret_key_bytes: [u8; 32] = seed[..32]
            .try_into()
            .map_err(|_| anyhow!("Failed to extract secret key from seed"))?;

        Ok(Self::from_keypair(Keypair::from_secret_key(&secret_key_bytes)))
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }
}

#[async_trait]
impl SigningKey for WalletKey {
    fn address(&self) -> String {
        self.keypair.public_key().to_string()
    }

    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        Ok(self.keypair.sign(message).to_bytes().to_vec())
    }
}

/// Text the wallet signs to attest a new identity key.
pub fn create_identity_text(key_bytes: &[u8]) -> String {
    format!(
        "XMTP : Create Identity\n{}\n\nFor more info: https://xmtp.org/signatures/",
        hex::encode(key_bytes)
    )
}

/// Text the wallet signs to unlock the private key store.
pub fn enable_identity_text(key_bytes: &[u8]) -> String {
    format!(
        "XMTP : Enable Identity\n{}\n\nFor more info: https://xmtp.org/signatures/",
        hex::encode(key_bytes)
    )
}

/// Check that `signature` over `message` was made by the wallet at `address`.
pub fn verify_wallet_signature(
    address: &str,
    message: &[u8],
    signature: &[u8],
) -> Result<(), KeyError> {
    let account =
        PublicKey::try_from(address).map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;

    let signature = to_signature(signature)?;
    account
        .verify(message, &signature)
        .map_err(|e| KeyError::BadSignature(e.to_string()))
}

pub(crate) fn to_signature(bytes: &[u8]) -> Result<Signature, KeyError> {
    let sig_bytes: [u8; SIGNATURE_SIZE] =
        bytes.try_into().map_err(|_| KeyError::InvalidSignatureLength {
            expected: SIGNATURE_SIZE,
            actual: bytes.len(),
        })?;
    Ok(Signature::from_bytes(&sig_bytes))
}
