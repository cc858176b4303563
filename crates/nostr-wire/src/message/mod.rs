// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Messages
//!
//! <https://github.com/nostr-protocol/nips/blob/master/01.md>

use core::fmt;

pub mod client;
pub mod relay;
pub mod subscription;

pub use self::client::ClientMessage;
pub use self::relay::RelayMessage;
pub use self::subscription::SubscriptionId;
use crate::event;

/// Messages error
#[derive(Debug)]
pub enum MessageHandleError {
    /// Invalid message format
    InvalidMessageFormat,
    /// First element is not a known message type
    UnknownMessageType(String),
    /// Impossible to deserialize message
    Json(serde_json::Error),
    /// Event error
    Event(event::Error),
}

impl std::error::Error for MessageHandleError {}

impl fmt::Display for MessageHandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMessageFormat => write!(f, "Message has an invalid format"),
            Self::UnknownMessageType(t) => write!(f, "Unknown message type: {t}"),
            Self::Json(e) => write!(f, "Json deserialization failed: {e}"),
            Self::Event(e) => write!(f, "Event: {e}"),
        }
    }
}

impl From<serde_json::Error> for MessageHandleError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<event::Error> for MessageHandleError {
    fn from(e: event::Error) -> Self {
        Self::Event(e)
    }
}

/// Split a message array into its type tag and the whole array
pub(crate) fn split_message(
    msg: &serde_json::Value,
) -> Result<(&str, &[serde_json::Value]), MessageHandleError> {
    let v = msg
        .as_array()
        .ok_or(MessageHandleError::InvalidMessageFormat)?;

    let ty: &str = v
        .first()
        .and_then(|t| t.as_str())
        .ok_or(MessageHandleError::InvalidMessageFormat)?;

    Ok((ty, v.as_slice()))
}
