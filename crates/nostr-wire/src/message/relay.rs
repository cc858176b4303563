// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Relay messages

use serde::{Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use super::{MessageHandleError, SubscriptionId};
use crate::Event;

/// Messages sent by relays, received by clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    /// `["EVENT", <subscription_id>, <event JSON>]` (NIP01)
    Event {
        /// Subscription ID
        subscription_id: SubscriptionId,
        /// Event
        event: Box<Event>,
    },
    /// `["EOSE", <subscription_id>]` (NIP01)
    EndOfStoredEvents(SubscriptionId),
    /// `["CLOSED", <subscription_id>, <message>]` (NIP01)
    Closed {
        /// Subscription ID
        subscription_id: SubscriptionId,
        /// Message
        message: String,
    },
    /// `["AUTH", <challenge-string>]` (NIP42)
    Auth {
        /// Challenge
        challenge: String,
    },
    /// `["NOTICE", <message>]` (NIP01)
    Notice {
        /// Message
        message: String,
    },
}

impl Serialize for RelayMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let json_value: Value = self.as_value();
        json_value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RelayMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json_value = Value::deserialize(deserializer)?;
        RelayMessage::from_value(json_value).map_err(serde::de::Error::custom)
    }
}

impl RelayMessage {
    /// Create new `EVENT` message
    #[inline]
    pub fn event(subscription_id: SubscriptionId, event: Event) -> Self {
        Self::Event {
            subscription_id,
            event: Box::new(event),
        }
    }

    /// Create new `EOSE` message
    #[inline]
    pub fn eose(subscription_id: SubscriptionId) -> Self {
        Self::EndOfStoredEvents(subscription_id)
    }

    /// Create new `CLOSED` message
    #[inline]
    pub fn closed<S>(subscription_id: SubscriptionId, message: S) -> Self
    where
        S: Into<String>,
    {
        Self::Closed {
            subscription_id,
            message: message.into(),
        }
    }

    /// Create new `NOTICE` message
    #[inline]
    pub fn notice<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self::Notice {
            message: message.into(),
        }
    }

    /// Create new `AUTH` message
    #[inline]
    pub fn auth<S>(challenge: S) -> Self
    where
        S: Into<String>,
    {
        Self::Auth {
            challenge: challenge.into(),
        }
    }

    /// Serialize as [`Value`]
    pub fn as_value(&self) -> Value {
        match self {
            Self::Event {
                event,
                subscription_id,
            } => json!(["EVENT", subscription_id, event]),
            Self::EndOfStoredEvents(subscription_id) => json!(["EOSE", subscription_id]),
            Self::Closed {
                subscription_id,
                message,
            } => json!(["CLOSED", subscription_id, message]),
            Self::Auth { challenge } => json!(["AUTH", challenge]),
            Self::Notice { message } => json!(["NOTICE", message]),
        }
    }

    /// Serialize [`RelayMessage`] as JSON string
    #[inline]
    pub fn as_json(&self) -> String {
        self.as_value().to_string()
    }

    /// Deserialize [`RelayMessage`] from [`Value`]
    ///
    /// **The event signature is NOT verified!**
    pub fn from_value(msg: Value) -> Result<Self, MessageHandleError> {
        let (ty, v) = super::split_message(&msg)?;
        let v_len: usize = v.len();

        match ty {
            // Relay response format: ["EVENT", <subscription id>, <event JSON>]
            "EVENT" => {
                if v_len != 3 {
                    return Err(MessageHandleError::InvalidMessageFormat);
                }

                let subscription_id: SubscriptionId = serde_json::from_value(v[1].clone())?;
                let event = Event::from_value(v[2].clone())?;

                Ok(Self::event(subscription_id, event))
            }
            // Relay response format: ["EOSE", <subscription_id>]
            "EOSE" => {
                if v_len != 2 {
                    return Err(MessageHandleError::InvalidMessageFormat);
                }

                let subscription_id: SubscriptionId = serde_json::from_value(v[1].clone())?;

                Ok(Self::eose(subscription_id))
            }
            // Relay response format: ["CLOSED", <subscription_id>, <message>]
            "CLOSED" => {
                if v_len != 3 {
                    return Err(MessageHandleError::InvalidMessageFormat);
                }

                let subscription_id: SubscriptionId = serde_json::from_value(v[1].clone())?;
                let message: String = serde_json::from_value(v[2].clone())?;

                Ok(Self::closed(subscription_id, message))
            }
            // Relay response format: ["AUTH", <challenge>]
            "AUTH" => {
                if v_len != 2 {
                    return Err(MessageHandleError::InvalidMessageFormat);
                }

                let challenge: String = serde_json::from_value(v[1].clone())?;

                Ok(Self::auth(challenge))
            }
            // Relay response format: ["NOTICE", <message>]
            "NOTICE" => {
                if v_len != 2 {
                    return Err(MessageHandleError::InvalidMessageFormat);
                }

                let message: String = serde_json::from_value(v[1].clone())?;

                Ok(Self::notice(message))
            }
            other => Err(MessageHandleError::UnknownMessageType(other.to_string())),
        }
    }

    /// Deserialize [`RelayMessage`] from JSON string
    ///
    /// **The event signature is NOT verified!**
    pub fn from_json<T>(json: T) -> Result<Self, MessageHandleError>
    where
        T: AsRef<[u8]>,
    {
        let msg: Value = serde_json::from_slice(json.as_ref())?;
        Self::from_value(msg)
    }
}
