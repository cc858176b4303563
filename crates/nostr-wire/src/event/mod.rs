// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Event

use core::fmt;
use core::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod id;
pub mod kind;
pub mod tag;

pub use self::id::EventId;
pub use self::kind::Kind;
pub use self::tag::Tag;
use crate::{JsonUtil, PublicKey, Timestamp};

/// [`Event`] error
#[derive(Debug)]
pub enum Error {
    /// Error serializing or deserializing JSON data
    Json(serde_json::Error),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "Json: {e}"),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// [`Event`] struct
///
/// Two events are equal when their ids are equal.
///
/// **The signature is carried as received and never verified.**
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Id
    pub id: EventId,
    /// Author
    pub pubkey: PublicKey,
    /// Timestamp (seconds)
    pub created_at: Timestamp,
    /// Kind
    pub kind: Kind,
    /// Vector of [`Tag`]
    pub tags: Vec<Tag>,
    /// Content
    pub content: String,
    /// Signature (hex)
    pub sig: String,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Event {
    /// Deserialize [`Event`] from [`Value`]
    ///
    /// **This method NOT verify the signature!**
    pub fn from_value(value: Value) -> Result<Self, Error> {
        Ok(serde_json::from_value(value)?)
    }

    /// Iterate the values of tags named `name` (first value after the tag name)
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |tag| tag.kind() == Some(name))
            .filter_map(|tag| tag.content())
    }

    /// Public keys referenced by `p` tags
    ///
    /// Malformed values are skipped.
    pub fn public_keys(&self) -> impl Iterator<Item = PublicKey> + '_ {
        self.tag_values("p")
            .filter_map(|value| PublicKey::from_hex(value).ok())
    }

    /// Event ids referenced by `e` tags
    ///
    /// Malformed values are skipped.
    pub fn event_ids(&self) -> impl Iterator<Item = EventId> + '_ {
        self.tag_values("e")
            .filter_map(|value| EventId::from_hex(value).ok())
    }
}

impl JsonUtil for Event {
    type Err = Error;
}
