use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as, DisplayFromStr, PickFirst};

use crate::topic::Topic;

/// The unit exchanged with the message API.
///
/// Serializes as `{"contentTopic", "timestampNs", "message"}` with the
/// timestamp as a decimal string and the payload base64 encoded.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub content_topic: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub timestamp_ns: u64,
    #[serde_as(as = "Base64")]
    #[serde(default)]
    pub message: Vec<u8>,
}

impl Envelope {
    pub fn new(topic: &Topic, timestamp_ns: u64, message: Vec<u8>) -> Self {
        Self {
            content_topic: topic.to_string(),
            timestamp_ns,
            message,
        }
    }
}

/// Nanoseconds since the Unix epoch
pub fn now_ns() -> Result<u64, SystemTimeError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64)
}
