// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Client messages

use serde::{Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use super::{MessageHandleError, SubscriptionId};
use crate::Filter;

/// Messages sent by clients, received by relays
///
/// A read-only client only opens and closes subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// `["REQ", <subscription_id>, <filter JSON>]`
    Req {
        /// Subscription ID
        subscription_id: SubscriptionId,
        /// Filter
        filter: Box<Filter>,
    },
    /// `["CLOSE", <subscription_id>]`
    Close(SubscriptionId),
}

impl Serialize for ClientMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let json_value: Value = self.as_value();
        json_value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClientMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json_value = Value::deserialize(deserializer)?;
        ClientMessage::from_value(json_value).map_err(serde::de::Error::custom)
    }
}

impl ClientMessage {
    /// Create new `REQ` message
    #[inline]
    pub fn req(subscription_id: SubscriptionId, filter: Filter) -> Self {
        Self::Req {
            subscription_id,
            filter: Box::new(filter),
        }
    }

    /// Create new `CLOSE` message
    #[inline]
    pub fn close(subscription_id: SubscriptionId) -> Self {
        Self::Close(subscription_id)
    }

    /// Check if is a `REQ` message
    #[inline]
    pub fn is_req(&self) -> bool {
        matches!(self, Self::Req { .. })
    }

    /// Serialize as [`Value`]
    pub fn as_value(&self) -> Value {
        match self {
            Self::Req {
                subscription_id,
                filter,
            } => json!(["REQ", subscription_id, filter]),
            Self::Close(subscription_id) => json!(["CLOSE", subscription_id]),
        }
    }

    /// Serialize [`ClientMessage`] as JSON string
    #[inline]
    pub fn as_json(&self) -> String {
        self.as_value().to_string()
    }

    /// Deserialize from [`Value`]
    pub fn from_value(msg: Value) -> Result<Self, MessageHandleError> {
        let (ty, v) = super::split_message(&msg)?;

        match ty {
            // ["REQ", <subscription_id>, <filter JSON>]
            "REQ" => {
                if v.len() != 3 {
                    return Err(MessageHandleError::InvalidMessageFormat);
                }
                let subscription_id: SubscriptionId = serde_json::from_value(v[1].clone())?;
                let filter: Filter = serde_json::from_value(v[2].clone())?;
                Ok(Self::req(subscription_id, filter))
            }
            // ["CLOSE", <subscription_id>]
            "CLOSE" => {
                if v.len() != 2 {
                    return Err(MessageHandleError::InvalidMessageFormat);
                }
                let subscription_id: SubscriptionId = serde_json::from_value(v[1].clone())?;
                Ok(Self::close(subscription_id))
            }
            other => Err(MessageHandleError::UnknownMessageType(other.to_string())),
        }
    }

    /// Deserialize [`ClientMessage`] from JSON string
    pub fn from_json<T>(json: T) -> Result<Self, MessageHandleError>
    where
        T: AsRef<[u8]>,
    {
        let msg: Value = serde_json::from_slice(json.as_ref())?;
        Self::from_value(msg)
    }
}
