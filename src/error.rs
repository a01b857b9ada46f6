use thiserror::Error;

use crate::transport::TransportError;

/// Errors from key material, bundle codecs and signing.
///
/// During a bootstrap or contact scan these are per-record failures: they are
/// logged and the record is skipped. They only reach the caller wrapped in
/// [`ClientError`].
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("signature verification failed: {0}")]
    BadSignature(String),

    #[error("bundle has no pre-key")]
    MissingPreKey,

    #[error("failed to decrypt private key bundle: {0}")]
    Decrypt(String),

    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("malformed base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("signer failed: {0:#}")]
    Signer(anyhow::Error),

    #[error("system clock is before the unix epoch")]
    Clock,
}

/// Errors surfaced by [`Client`](crate::Client) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Key generation, signing or auth-token derivation failed. The session
    /// cannot proceed without an identity.
    #[error("identity error")]
    Identity(#[source] KeyError),

    /// Passed through from the transport untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encoding one of our own outbound records failed.
    #[error("codec error")]
    Codec(#[source] KeyError),

    #[error("system clock is before the unix epoch")]
    Clock,
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
