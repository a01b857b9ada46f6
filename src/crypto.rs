use curve25519_dalek::edwards::CompressedEdwardsY;
use rand::RngCore;
use sha2::{Digest, Sha512};
use x25519_dalek::{PublicKey, StaticSecret};

use crate::error::KeyError;

const STORE_KEY_CONTEXT: &str = "xmtp-session 2024 private key store v1";

/// X25519 agreement between our Ed25519 secret and a peer's Ed25519 public
/// key, both mapped onto Curve25519 first.
pub fn shared_secret(own_secret: &[u8; 32], peer_public: &[u8]) -> Result<[u8; 32], KeyError> {
    let peer: [u8; 32] = peer_public
        .try_into()
        .map_err(|_| KeyError::InvalidKeyLength {
            expected: 32,
            actual: peer_public.len(),
        })?;

    let peer_montgomery = CompressedEdwardsY(peer)
        .decompress()
        .map(|point| point.to_montgomery().to_bytes())
        .ok_or_else(|| KeyError::InvalidPublicKey("not a point on Curve25519".to_string()))?;

    // The X25519 scalar is the low half of the expanded Ed25519 secret,
    // which is clamped again inside `diffie_hellman`.
    let digest = Sha512::digest(own_secret);
    let mut scalar = [0u8; 32];
    scalar.copy_from_slice(&digest[..32]);

    let shared = StaticSecret::from(scalar).diffie_hellman(&PublicKey::from(peer_montgomery));
    Ok(shared.to_bytes())
}

/// Symmetric key for the private store, derived from the wallet's
/// enable-identity signature.
pub fn derive_store_secret(wallet_signature: &[u8]) -> [u8; 32] {
    blake3::derive_key(STORE_KEY_CONTEXT, wallet_signature)
}

pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}
