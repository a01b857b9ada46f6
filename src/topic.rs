use std::fmt;

/// Routing key for a class of envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Encrypted private key bundles of an account
    UserPrivateStoreKeyBundle(String),
    /// Published contact bundles of an account
    Contact(String),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::UserPrivateStoreKeyBundle(address) => {
                write!(f, "/xmtp/0/privatestore-{}/key_bundle/proto", address)
            }
            Topic::Contact(address) => write!(f, "/xmtp/0/contact-{}/proto", address),
        }
    }
}
