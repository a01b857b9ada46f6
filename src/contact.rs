use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::KeyError;
use crate::keys::PublicKeyBundle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBundleV1 {
    pub key_bundle: PublicKeyBundle,
}

/// Public key material an account publishes so peers can find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactBundle {
    #[serde(rename = "v1")]
    V1(ContactBundleV1),
}

impl ContactBundle {
    pub fn new(key_bundle: PublicKeyBundle) -> Self {
        Self::V1(ContactBundleV1 { key_bundle })
    }

    pub fn key_bundle(&self) -> &PublicKeyBundle {
        match self {
            ContactBundle::V1(v1) => &v1.key_bundle,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, KeyError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a contact record. Older clients published a bare
    /// [`PublicKeyBundle`], which is accepted as a v1 bundle.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        match serde_json::from_slice::<ContactBundle>(bytes) {
            Ok(bundle) => Ok(bundle),
            Err(err) => match serde_json::from_slice::<PublicKeyBundle>(bytes) {
                Ok(legacy) => Ok(Self::new(legacy)),
                Err(_) => Err(err.into()),
            },
        }
    }

    pub fn from_envelope(envelope: &Envelope) -> Result<Self, KeyError> {
        Self::from_bytes(&envelope.message)
    }
}
