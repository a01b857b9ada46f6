//! # XMTP Session
//!
//! Identity bootstrap and authenticated envelope exchange for an XMTP-style
//! messaging client.
//!
//! ## Features
//!
//! - Recover the account's private key bundle from its private store, or
//!   generate and wallet-attest a new one
//! - Publish envelopes with a freshly minted auth token per call
//! - Publish this account's contact bundle and look up peers' bundles
//! - HTTP transport for the message API, plus an in-memory relay
//!
//! ## Example
//!
//! ```no_run
//! use xmtp_session::{Client, ClientOptions, WalletKey};
//!
//! # async fn example() -> xmtp_session::Result<()> {
//! let wallet = WalletKey::random();
//!
//! // Recover or create keys
//! let client = Client::create(&wallet, ClientOptions::default()).await?;
//!
//! // Let peers find us
//! client.publish_user_contact().await?;
//!
//! // Find a peer
//! if let Some(contact) = client.get_user_contact("peer_address").await? {
//!     println!("{:?}", contact.key_bundle().identity_key);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod bootstrap;
mod client;
pub mod config;
pub mod contact;
pub mod crypto;
pub mod encrypted;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod signer;
pub mod topic;
pub mod transport;

pub use auth::{AuthData, AuthToken, AuthorizedIdentity};
pub use bootstrap::{IdentitySource, ResolvedIdentity};
pub use client::Client;
pub use config::{ApiOptions, ClientOptions, Environment};
pub use contact::ContactBundle;
pub use encrypted::EncryptedPrivateKeyBundle;
pub use envelope::Envelope;
pub use error::{ClientError, KeyError, Result};
pub use keys::{PrivateKeyBundle, PrivateKeyBundleV1, PublicKeyBundle, SignedPublicKey};
pub use signer::{SigningKey, WalletKey};
pub use topic::Topic;
pub use transport::{ApiClient, MemoryTransport, Transport, TransportError};

pub use bip39::Language;
pub use pkarr::Keypair;
