//! Per-publish proof of identity.
//!
//! A token binds the wallet address, the wallet-attested identity key and a
//! fresh timestamp and nonce, signed by the identity key. A new token is
//! minted for every publish and never stored.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as, DisplayFromStr};
use uuid::Uuid;

use crate::envelope::now_ns;
use crate::error::KeyError;
use crate::keys::{PrivateKey, PrivateKeyBundleV1, SignedPublicKey};

/// The signed claims inside a token.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub wallet_addr: String,
    #[serde_as(as = "DisplayFromStr")]
    pub created_ns: u64,
    pub nonce: String,
}

#[serde_as]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
    identity_key: SignedPublicKey,
    #[serde_as(as = "Base64")]
    auth_data_bytes: Vec<u8>,
    #[serde_as(as = "Base64")]
    auth_data_signature: Vec<u8>,
}

/// Bearer token sent with a publish request.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relay-side check: the claims are signed by the enclosed identity key
    /// and that key is attested by the claimed wallet.
    pub fn verify(&self) -> Result<AuthData, KeyError> {
        let payload: TokenPayload = serde_json::from_slice(&BASE64.decode(&self.0)?)?;

        payload
            .identity_key
            .verify(&payload.auth_data_bytes, &payload.auth_data_signature)?;
        let auth_data: AuthData = serde_json::from_slice(&payload.auth_data_bytes)?;
        payload
            .identity_key
            .verify_wallet_attestation(&auth_data.wallet_addr)?;

        Ok(auth_data)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({}...)", &self.0[..self.0.len().min(12)])
    }
}

/// An identity key authorized to act for a wallet address.
pub struct AuthorizedIdentity {
    pub address: String,
    pub authorized: SignedPublicKey,
    pub identity: PrivateKey,
}

impl AuthorizedIdentity {
    pub fn new(address: impl Into<String>, keys: &PrivateKeyBundleV1) -> Self {
        Self {
            address: address.into(),
            authorized: keys.identity_key.public_key.clone(),
            identity: keys.identity_key.clone(),
        }
    }

    /// Mint a fresh token.
    ///
    /// Fails if the authorized key is not the identity's own public key or
    /// lacks a valid attestation from the wallet.
    pub fn create_auth_token(&self) -> Result<AuthToken, KeyError> {
        if !self.identity.matches(&self.authorized) {
            return Err(KeyError::InvalidPublicKey(
                "authorized key is not the identity's public key".to_string(),
            ));
        }
        self.authorized.verify_wallet_attestation(&self.address)?;

        let auth_data = AuthData {
            wallet_addr: self.address.clone(),
            created_ns: now_ns().map_err(|_| KeyError::Clock)?,
            nonce: Uuid::new_v4().to_string(),
        };
        let auth_data_bytes = serde_json::to_vec(&auth_data)?;
        let auth_data_signature = self.identity.sign(&auth_data_bytes)?;

        let payload = TokenPayload {
            identity_key: self.authorized.clone(),
            auth_data_bytes,
            auth_data_signature,
        };
        Ok(AuthToken(BASE64.encode(serde_json::to_vec(&payload)?)))
    }
}
